//! Health command implementation
//!
//! Runs every registered provider's health check concurrently. Exits with 0
//! when all are healthy and 1 otherwise.

use crate::adapters::HealthReport;
use crate::cli::{build_registry, load_or_default};
use clap::Args;

/// Arguments for the health command
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Print the reports as JSON
    #[arg(long)]
    pub json: bool,
}

/// Exit code for a set of reports
pub(crate) fn exit_code(reports: &[HealthReport]) -> i32 {
    if reports.iter().all(|r| r.healthy) {
        0
    } else {
        1
    }
}

impl HealthArgs {
    /// Execute the health command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = build_registry(&config);
        let reports = registry.health_check_all().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
            return Ok(exit_code(&reports));
        }

        println!("🩺 Provider health");
        println!();
        if reports.is_empty() {
            println!("  No providers registered");
        }
        for report in &reports {
            let mark = if report.healthy { "✅" } else { "❌" };
            println!("  {mark} {} ({})", report.provider, report.capability);
        }
        println!();

        Ok(exit_code(&reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Capability;

    fn report(healthy: bool) -> HealthReport {
        HealthReport {
            provider: "apollo".to_string(),
            capability: Capability::Consultation,
            healthy,
        }
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(&[]), 0);
        assert_eq!(exit_code(&[report(true), report(true)]), 0);
        assert_eq!(exit_code(&[report(true), report(false)]), 1);
    }
}
