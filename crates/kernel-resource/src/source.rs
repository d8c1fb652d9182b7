//! Key-value property sources
//!
//! Terminal lookups consulted by the environment and override resolver
//! stages.

use std::collections::HashMap;

/// A key to value lookup.
pub trait PropertySource: Send + Sync {
    fn property(&self, key: &str) -> Option<String>;
}

/// Process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl PropertySource for ProcessEnvironment {
    fn property(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Command-line style process properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideProperties {
    values: HashMap<String, String>,
}

impl OverrideProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Collect `-Dkey=value` arguments. A bare `-Dkey` sets an empty value;
    /// every other argument is ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties = Self::new();
        for arg in args {
            let Some(definition) = arg.as_ref().strip_prefix("-D") else {
                continue;
            };
            let (key, value) = definition.split_once('=').unwrap_or((definition, ""));
            let key = key.trim();
            if !key.is_empty() {
                properties.set(key, value.trim());
            }
        }
        properties
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertySource for OverrideProperties {
    fn property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for OverrideProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.set(key, value);
        }
        properties
    }
}
