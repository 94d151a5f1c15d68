//! Report logged when every connection attempt has failed.

use std::fmt;

use common::CacheError;
use domain::ConnectionConfig;

/// First line of the report
pub const REPORT_HEADER: &str = "=== Cache connection diagnostics ===";

const REPORT_FOOTER: &str = "=====================================";

const LIKELY_CAUSES: [&str; 5] = [
    "Cache service is not running or the port is taken by another process",
    "Configured host or port is wrong",
    "Configured password is wrong",
    "Network problem or a firewall is blocking the connection",
    "Connection timeout is too short",
];

/// Multi-line exhaustion report.
///
/// Prints the configuration (with the password masked), the last error and
/// fixed checklists of causes and remedies.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    host: String,
    port: u16,
    database: u32,
    password: &'static str,
    timeout_ms: u64,
    attempts: u32,
    error_kind: String,
    error_message: String,
}

impl DiagnosticReport {
    pub fn new(config: &ConnectionConfig, attempts: u32, error: &CacheError) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            database: config.database,
            password: config.password_display(),
            timeout_ms: config.timeout_ms,
            attempts,
            error_kind: error.kind(),
            error_message: error.to_string(),
        }
    }

    fn remedies(&self) -> [String; 4] {
        [
            "Check the cache service status: `redis-server` or `systemctl status redis`".to_string(),
            format!(
                "Verify the port is listening: `ss -ltn | grep {}`",
                self.port
            ),
            "Check the cache password in the configuration".to_string(),
            format!(
                "Test connectivity: `redis-cli -h {} -p {} ping`",
                self.host, self.port
            ),
        ]
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", REPORT_HEADER)?;
        writeln!(f, "Host: {}", self.host)?;
        writeln!(f, "Port: {}", self.port)?;
        writeln!(f, "Database: {}", self.database)?;
        writeln!(f, "Password: {}", self.password)?;
        writeln!(f, "Connection timeout: {}ms", self.timeout_ms)?;
        writeln!(f, "Attempts: {}", self.attempts)?;
        writeln!(f, "Error kind: {}", self.error_kind)?;
        writeln!(f, "Error message: {}", self.error_message)?;

        writeln!(f)?;
        writeln!(f, "Possible causes:")?;
        for (i, cause) in LIKELY_CAUSES.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, cause)?;
        }

        writeln!(f)?;
        writeln!(f, "Suggested fixes:")?;
        for (i, remedy) in self.remedies().iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, remedy)?;
        }
        write!(f, "{}", REPORT_FOOTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refused() -> CacheError {
        CacheError::from(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "Connection refused",
        )))
    }

    #[test]
    fn test_report_masks_password() {
        let config = ConnectionConfig::new("cache.internal").with_password("hunter2");
        let report = DiagnosticReport::new(&config, 3, &refused()).to_string();

        assert!(report.contains("Password: ******"));
        assert!(!report.contains("hunter2"));
    }

    #[test]
    fn test_report_without_password() {
        let report = DiagnosticReport::new(&ConnectionConfig::default(), 3, &refused()).to_string();
        assert!(report.contains("Password: (empty)"));
    }

    #[test]
    fn test_report_layout() {
        let config = ConnectionConfig::new("localhost")
            .with_port(6380)
            .with_database(2);
        let report = DiagnosticReport::new(&config, 3, &refused()).to_string();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], REPORT_HEADER);
        assert_eq!(lines[1], "Host: localhost");
        assert_eq!(lines[2], "Port: 6380");
        assert_eq!(lines[3], "Database: 2");
        assert_eq!(lines[5], "Connection timeout: 2000ms");
        assert_eq!(lines[7], "Error kind: IoError");
        assert!(lines[8].contains("Connection refused"));
        assert!(report.contains("5. Connection timeout is too short"));
        assert!(report.contains("redis-cli -h localhost -p 6380 ping"));
        assert!(lines[lines.len() - 1].starts_with("====="));
    }
}
