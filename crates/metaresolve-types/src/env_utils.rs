//! Environment variable parsing utilities.
//!
//! Type-safe helpers for parsing environment variables with defaults,
//! eliminating repeated boilerplate like:
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
///
/// # Example
///
/// ```
/// use metaresolve_types::env_utils::env_var_or;
///
/// let timeout: u64 = env_var_or("TIMEOUT_MS", 5000);
/// let retries: usize = env_var_or("MAX_RETRIES", 3);
/// ```
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_or_uses_default_when_unset() {
        let value: u64 = env_var_or("METARESOLVE_TEST_UNSET_VAR_1", 50);
        assert_eq!(value, 50);
    }

    #[test]
    fn env_var_or_parses_set_value() {
        std::env::set_var("METARESOLVE_TEST_SET_VAR_1", "7");
        let value: u64 = env_var_or("METARESOLVE_TEST_SET_VAR_1", 50);
        assert_eq!(value, 7);
        std::env::remove_var("METARESOLVE_TEST_SET_VAR_1");
    }

    #[test]
    fn env_var_returns_none_when_unparseable() {
        std::env::set_var("METARESOLVE_TEST_BAD_VAR_1", "not-a-number");
        let value: Option<u64> = env_var("METARESOLVE_TEST_BAD_VAR_1");
        assert!(value.is_none());
        std::env::remove_var("METARESOLVE_TEST_BAD_VAR_1");
    }
}
