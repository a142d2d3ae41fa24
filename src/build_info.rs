//! Build information
//!
//! Build counter and timestamp stamped in by `build.rs`, plus the banner
//! shown on startup.

use serde::Serialize;

use crate::config::Config;

pub const BUILD_NUMBER: u64 = match option_env!("KCAL_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

pub const BUILD_TIMESTAMP: &str = match option_env!("KCAL_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimal digits only; anything else yields `None`
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (digit - b'0') as u64;
        i += 1;
    }
    Some(value)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// e.g. `v1.0.0 build 17 (2025-01-09T08:00:00Z)`
    pub fn label(&self) -> String {
        format!(
            "v{} build {} ({})",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Startup banner lines for a configured server
pub fn banner_lines(config: &Config) -> Vec<String> {
    vec![
        format!("Kcal Tracker {}", BuildInfo::current().label()),
        format!("  database: {}", config.database_path.display()),
        format!("  products: {}", config.product_api_url),
        format!("  search limit: {}", config.search_limit),
    ]
}

/// Print the startup banner to stderr; stdout carries the MCP stream
pub fn print_startup_banner(config: &Config) {
    for line in banner_lines(config) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("0"), Some(0));
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("4x"), None);
    }

    #[test]
    fn test_label_names_version_and_build() {
        let label = BuildInfo::current().label();
        assert!(label.starts_with(&format!("v{} build ", VERSION)));
    }

    #[test]
    fn test_banner_reports_configuration() {
        let config = Config {
            database_path: std::path::PathBuf::from("/tmp/kcal.db"),
            product_api_url: "http://localhost:8080".to_string(),
            search_limit: 5,
        };
        let lines = banner_lines(&config);
        assert!(lines[0].starts_with("Kcal Tracker v"));
        assert!(lines.iter().any(|l| l.ends_with("/tmp/kcal.db")));
        assert!(lines.iter().any(|l| l.ends_with("http://localhost:8080")));
    }
}
