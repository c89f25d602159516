//! Named configuration lookups.
//!
//! Services read tunables (hash cost, image host credentials) through a
//! [`ConfigProvider`] at call time, so values can change without rebuilding
//! the service.

use std::collections::HashMap;
use std::env;

/// Key-value configuration lookup.
pub trait ConfigProvider: Send + Sync {
    /// Look up a configuration value. `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// Provider backed by process environment variables.
///
/// Keys are mapped to upper snake case: `salt_rounds` -> `SALT_ROUNDS`,
/// `imagekit.publicKey` -> `IMAGEKIT_PUBLIC_KEY`. The environment is read on
/// every lookup.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    prefix: Option<String>,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `{PREFIX}_` to every variable name
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Environment variable name for a configuration key
    pub fn var_name(&self, key: &str) -> String {
        let name = env_var_name(key);
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), name),
            None => name,
        }
    }
}

impl ConfigProvider for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        env::var(self.var_name(key)).ok()
    }
}

/// In-memory provider for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: HashMap<String, String>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigProvider for StaticConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn env_var_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;

    for c in key.chars() {
        if c == '.' || c == '-' || c == '_' {
            name.push('_');
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower {
                name.push('_');
            }
            name.push(c);
            prev_lower = false;
        } else {
            name.push(c.to_ascii_uppercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }

    name
}
