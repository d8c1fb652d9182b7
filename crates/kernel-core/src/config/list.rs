use super::Resolver;
use crate::Result;
use crate::chain::Successor;
use regex::Regex;
use std::sync::LazyLock;

static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Splits comma-separated tokens into one token per element.
#[derive(Debug, Default)]
pub struct ListResolver {
    next: Successor<dyn Resolver>,
}

impl ListResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for ListResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .next
            .resolve(key)?
            .iter()
            .flat_map(|value| LIST_SEPARATOR.split(value))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect())
    }
}

resolver_plugin!(ListResolver);
