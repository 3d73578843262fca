//! Backend maintenance commands: health, cache stats and cache clearing.

use std::error::Error;

use crate::api::{ApiClient, HealthResponse};
use crate::cli::ask::exit_with_diagnostic;

pub fn format_health(health: &HealthResponse) -> String {
    format!("✅ Connected to backend API ({}: {})", health.service, health.status)
}

pub async fn run_health(client: &ApiClient) -> Result<(), Box<dyn Error>> {
    match client.health_check().await {
        Ok(health) => {
            println!("{}", format_health(&health));
            println!("   {}", client.base_url());
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Unable to connect to the API server at {}", client.base_url());
            exit_with_diagnostic(&err)
        }
    }
}

pub async fn run_stats(client: &ApiClient) -> Result<(), Box<dyn Error>> {
    match client.cache_stats().await {
        Ok(stats) => {
            println!("Cache statistics:");
            for line in stats.summary_lines() {
                println!("  {line}");
            }
            if let Some(backend) = &stats.backend {
                println!("  Storage: {backend}");
            }
            Ok(())
        }
        Err(err) => exit_with_diagnostic(&err),
    }
}

pub async fn run_clear_cache(client: &ApiClient) -> Result<(), Box<dyn Error>> {
    match client.clear_cache().await {
        Ok(ack) => {
            println!("✅ {}", ack.message);
            Ok(())
        }
        Err(err) => exit_with_diagnostic(&err),
    }
}
