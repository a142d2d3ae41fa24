//! Runtime configuration
//!
//! Everything is read from the environment once at startup.

use std::path::PathBuf;

/// Default product database (Open Food Facts)
pub const DEFAULT_PRODUCT_API_URL: &str = "https://world.openfoodfacts.org";

/// Default page size for product name search
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub product_api_url: String,
    pub search_limit: u32,
}

impl Config {
    /// Build the configuration from `KCAL_*` environment variables
    pub fn from_env() -> Self {
        let product_api_url = std::env::var("KCAL_PRODUCT_API_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_API_URL.to_string());

        let search_limit = std::env::var("KCAL_SEARCH_LIMIT")
            .ok()
            .and_then(|s| parse_search_limit(&s))
            .unwrap_or(DEFAULT_SEARCH_LIMIT);

        Self {
            database_path: database_path(),
            product_api_url,
            search_limit,
        }
    }
}

/// Get the database path from environment or use default
///
/// The default is `data/kcal.db` next to the project root when running
/// from `target/debug` or `target/release`.
pub fn database_path() -> PathBuf {
    std::env::var("KCAL_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path.push("kcal.db");
            path
        })
}

fn parse_search_limit(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| (1..=100).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_limit() {
        assert_eq!(parse_search_limit("20"), Some(20));
        assert_eq!(parse_search_limit(" 5 "), Some(5));
        assert_eq!(parse_search_limit("0"), None);
        assert_eq!(parse_search_limit("500"), None);
        assert_eq!(parse_search_limit("many"), None);
    }

    #[test]
    fn test_default_database_path_file_name() {
        if std::env::var("KCAL_DATABASE_PATH").is_err() {
            let path = database_path();
            assert!(path.ends_with("data/kcal.db"));
        }
    }
}
