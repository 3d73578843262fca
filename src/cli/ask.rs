//! TUI-less "ask" and "batch" commands

use std::error::Error;

use crate::api::{ApiClient, ApiError, BatchQueryResponse};
use crate::core::guidance::diagnostic_for;

/// Runs one query and returns the text to print. Failures come back as the
/// same diagnostic the chat transcript would show.
pub async fn ask(client: &ApiClient, query: &str, use_cache: bool) -> Result<String, String> {
    client
        .query(query, use_cache)
        .await
        .map(|response| response.response)
        .map_err(|err| diagnostic_for(&err))
}

pub async fn run_ask(client: &ApiClient, query: &str, use_cache: bool) -> Result<(), Box<dyn Error>> {
    if query.trim().is_empty() {
        eprintln!("Usage: tubechat ask <question>");
        std::process::exit(1);
    }

    match ask(client, query, use_cache).await {
        Ok(response) => {
            println!("{response}");
            Ok(())
        }
        Err(diagnostic) => {
            eprintln!("{diagnostic}");
            std::process::exit(1);
        }
    }
}

pub fn format_batch(response: &BatchQueryResponse) -> String {
    let mut out = String::new();
    for (idx, result) in response.results.iter().enumerate() {
        out.push_str(&format!("## {}. {}\n\n", idx + 1, result.query));
        if result.success {
            out.push_str(&result.response);
        } else {
            let reason = result.error.as_deref().unwrap_or("unknown error");
            out.push_str(&format!("❌ Failed: {reason}"));
        }
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "{} total, {} succeeded, {} failed",
        response.total, response.successful, response.failed
    ));
    out
}

pub async fn run_batch(
    client: &ApiClient,
    queries: Vec<String>,
    use_cache: bool,
) -> Result<(), Box<dyn Error>> {
    let queries: Vec<String> = queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    if queries.is_empty() {
        eprintln!("Usage: tubechat batch <question>...");
        std::process::exit(1);
    }

    match client.batch(queries, use_cache).await {
        Ok(response) => {
            println!("{}", format_batch(&response));
            if response.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(err) => exit_with_diagnostic(&err),
    }
}

pub(crate) fn exit_with_diagnostic(err: &ApiError) -> ! {
    eprintln!("{}", diagnostic_for(err));
    std::process::exit(1);
}
