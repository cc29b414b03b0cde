//! Environment configuration helpers
//!
//! Every configuration type in the workspace reads its settings through an
//! [`EnvSource`]. Production code uses [`ProcessEnv`]; tests hand in a
//! [`MapEnv`] so they never touch the real process environment.

use std::collections::HashMap;
use std::str::FromStr;

/// Load a `.env` file from the working directory (or a parent) if present.
///
/// Returns `true` when a file was found and applied. Variables already set
/// in the process environment are left untouched.
pub fn load_dotenv() -> bool {
    dotenv::dotenv().is_ok()
}

/// A read-only key/value view of configuration
pub trait EnvSource {
    /// Raw lookup
    fn get(&self, key: &str) -> Option<String>;

    /// Lookup that treats empty or whitespace-only values as absent
    fn non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Lookup with a default for absent or empty values
    fn get_or(&self, key: &str, default: &str) -> String {
        self.non_empty(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a value, falling back to the default when absent or unparsable
    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        match self.non_empty(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "ignoring unparsable environment value");
                default
            }),
            None => default,
        }
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
