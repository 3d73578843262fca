//! User-facing diagnostics for failed requests.
//!
//! A failed query is reported twice: the raw error text goes to the banner,
//! and the text built here is appended to the transcript as an assistant
//! message so the remediation stays next to the question that failed.

use crate::api::ApiError;

pub fn diagnostic_for(err: &ApiError) -> String {
    let mut content = format!("❌ **Error**: {err}");
    let guidance = match err {
        ApiError::RateLimited { .. } => rate_limit_guidance(),
        ApiError::Unreachable { .. } => connection_guidance(),
        ApiError::Timeout => timeout_guidance(),
        ApiError::ProtocolMismatch { .. } => misconfiguration_guidance(),
        ApiError::BackendError { hints, .. } => backend_guidance(hints),
        ApiError::Decode { .. } => decode_guidance(),
    };
    content.push_str("\n\n");
    content.push_str(&guidance);
    content
}

fn rate_limit_guidance() -> String {
    "**What happened?**\n\
     The agent's LLM provider refused the request because its usage limit was reached. \
     Free tiers usually allow a fixed number of tokens per day.\n\n\
     **Solutions:**\n\
     1. Wait for the rate limit to reset (usually 24 hours)\n\
     2. Upgrade the provider plan to get a higher limit\n\
     3. Switch the backend to a different LLM provider in its configuration\n\
     4. Repeat earlier questions: cached answers do not count against the limit"
        .to_string()
}

fn connection_guidance() -> String {
    "**Troubleshooting:**\n\
     1. Check your internet connection\n\
     2. Verify the API server is running and accessible\n\
     3. Press Ctrl+R (or type `/retry`) to check the connection again"
        .to_string()
}

fn timeout_guidance() -> String {
    "**What happened?**\n\
     The agent did not answer within two minutes. Long videos can take a while to transcribe \
     and summarize.\n\n\
     **Try this:**\n\
     1. Send the question again with `/resend`; a finished answer may now be cached\n\
     2. Ask for a shorter summary or a specific part of the video"
        .to_string()
}

fn misconfiguration_guidance() -> String {
    "**Configuration problem:**\n\
     The server answered with a web page instead of the agent API. This usually means the \
     API URL is wrong or a proxy is not forwarding API requests.\n\n\
     1. Point `--api-url` or `TUBECHAT_API_URL` at the agent API root (for example `http://localhost:8000`)\n\
     2. If you use a proxy prefix such as `/api`, make sure it forwards `/query` and `/health`"
        .to_string()
}

fn backend_guidance(hints: &[String]) -> String {
    let mut text = String::from("**What you can try:**\n");
    if hints.is_empty() {
        text.push_str("1. Send the question again with `/resend`\n");
        text.push_str("2. Check the agent server logs for details");
    } else {
        let lines: Vec<String> = hints
            .iter()
            .enumerate()
            .map(|(idx, hint)| format!("{}. {}", idx + 1, hint))
            .collect();
        text.push_str(&lines.join("\n"));
    }
    text
}

fn decode_guidance() -> String {
    "**What happened?**\n\
     The backend answered, but not in the format this client expects. The agent server and \
     this client may be from different versions."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_mentions_rate_limit_and_keeps_suggestion() {
        let err = ApiError::RateLimited {
            message: "Daily token limit reached.".to_string(),
            suggestion: Some("Wait for the rate limit to reset or upgrade your API plan".into()),
        };
        let text = diagnostic_for(&err);
        assert!(text.contains("Rate Limit"));
        assert!(text.contains("Wait for the rate limit to reset or upgrade your API plan"));
        assert!(text.contains("**Solutions:**"));
    }

    #[test]
    fn unreachable_gets_troubleshooting() {
        let text = diagnostic_for(&ApiError::Unreachable {
            reason: "connection failed".into(),
        });
        assert!(text.starts_with("❌ **Error**: Cannot connect to backend API"));
        assert!(text.contains("**Troubleshooting:**"));
    }

    #[test]
    fn backend_hints_are_numbered() {
        let text = diagnostic_for(&ApiError::BackendError {
            status: 500,
            message: "LLM API returned HTML instead of JSON".into(),
            hints: vec!["Check the key".into(), "Check the URL".into()],
        });
        assert!(text.contains("1. Check the key\n2. Check the URL"));
    }

    #[test]
    fn every_kind_has_guidance() {
        let errors = [
            ApiError::Timeout,
            ApiError::ProtocolMismatch {
                status: 404,
                content_type: "text/html".into(),
            },
            ApiError::Decode {
                reason: "missing field".into(),
            },
        ];
        for err in errors {
            let text = diagnostic_for(&err);
            assert!(text.contains(&err.to_string()));
            assert!(text.contains("\n\n**"));
        }
    }
}
