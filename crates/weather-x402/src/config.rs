//! Configuration-source abstraction shared by the server and client.
//!
//! Resolution precedence is always explicit override first, then a
//! [`ConfigSource`], then a hard failure — payment-critical fields are
//! never silently defaulted. Keeping the source behind a trait lets
//! tests resolve configuration without mutating the process environment.

use std::collections::HashMap;

/// A read-only key/value configuration source.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Process-environment source used in production.
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source() {
        let mut source = HashMap::new();
        source.insert("KEY".to_string(), "value".to_string());
        assert_eq!(ConfigSource::get(&source, "KEY").as_deref(), Some("value"));
        assert_eq!(ConfigSource::get(&source, "MISSING"), None);
    }
}
