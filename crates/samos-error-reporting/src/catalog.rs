//! Error code catalog and lookup.
//!
//! Maps error codes (like "S-3-1") to their subsystem, title and default
//! message. Codes are `S-<subsystem>-<number>`:
//!
//! - `0` internal
//! - `1` reader
//! - `2` decoder
//! - `3` store
//! - `4` loader

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of `error_catalog.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    pub subsystem: String,
    /// Used as the diagnostic title
    pub title: String,
    pub message_template: String,
    /// Crate version that introduced the code
    pub since_version: String,
}

/// Global error catalog, embedded at compile time and parsed on first use.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid, which the catalog tests catch.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON")
});

/// Look up error code information.
///
/// ```
/// use samos_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("S-3-1").unwrap();
/// assert_eq!(info.title, "Duplicate Key");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get the subsystem name for an error code.
pub fn get_subsystem(code: &str) -> Option<&str> {
    ERROR_CATALOG.get(code).map(|info| info.subsystem.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        assert!(!ERROR_CATALOG.is_empty());
    }

    #[test]
    fn test_codes_match_subsystem_numbers() {
        let subsystems = ["internal", "reader", "decoder", "store", "loader"];

        for (code, info) in ERROR_CATALOG.iter() {
            let mut parts = code.split('-');
            assert_eq!(parts.next(), Some("S"), "bad prefix in {}", code);
            let subsystem: usize = parts.next().unwrap().parse().unwrap();
            assert_eq!(subsystems[subsystem], info.subsystem, "code {}", code);
        }
    }

    #[test]
    fn test_get_subsystem() {
        assert_eq!(get_subsystem("S-0-1"), Some("internal"));
        assert_eq!(get_subsystem("S-4-2"), Some("loader"));
        assert_eq!(get_subsystem("S-9-9"), None);
    }

    #[test]
    fn test_nonexistent_code() {
        assert!(get_error_info("Q-1-1").is_none());
    }
}
