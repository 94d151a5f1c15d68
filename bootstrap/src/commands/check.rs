//! Check command - establish the connection and report its state.

use serde::Serialize;

use cache_connector::CacheHandle;
use common::{AppError, AppResult};
use domain::{ConnectionConfig, EnvironmentMode};

use super::{open_handle, Context};
use crate::cli::CheckArgs;

/// Printed by `check --json`.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub status: &'static str,
    pub mode: EnvironmentMode,
    pub reachable: bool,
    pub config: &'a ConnectionConfig,
}

impl<'a> CheckReport<'a> {
    pub fn new(
        handle: &CacheHandle,
        reachable: bool,
        mode: EnvironmentMode,
        config: &'a ConnectionConfig,
    ) -> Self {
        Self {
            status: if handle.is_placeholder() {
                "placeholder"
            } else {
                "live"
            },
            mode,
            reachable,
            config,
        }
    }
}

/// Execute the check command
pub async fn execute(args: CheckArgs, ctx: Context) -> AppResult<()> {
    let handle = open_handle(&ctx).await?;
    let reachable = handle.ping()?;
    let report = CheckReport::new(
        &handle,
        reachable,
        ctx.effective_mode(),
        &ctx.settings.connection,
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::internal(format!("Failed to render report: {}", e)))?;
        println!("{}", json);
    } else {
        println!(
            "cache {} at {} (db {}, mode {})",
            report.status,
            report.config.address(),
            report.config.database,
            report.mode
        );
    }

    handle.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use cache_connector::CacheCodec;

    use super::*;

    #[test]
    fn test_placeholder_report_json() {
        let handle = CacheHandle::placeholder(CacheCodec::new());
        let config = ConnectionConfig::default().with_password("s3cret");
        let report = CheckReport::new(&handle, false, EnvironmentMode::Development, &config);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "placeholder");
        assert_eq!(json["mode"], "development");
        assert_eq!(json["reachable"], false);
        assert_eq!(json["config"]["port"], 6379);
        assert!(json["config"].get("password").is_none());
    }
}
