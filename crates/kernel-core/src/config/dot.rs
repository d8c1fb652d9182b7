use super::Resolver;
use crate::Result;
use crate::chain::Successor;

/// Key normalization: `racingCar` and `RacingCar` both become `racing.car`.
#[derive(Debug, Default)]
pub struct DotResolver {
    next: Successor<dyn Resolver>,
}

impl DotResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Canonical dot-case form of a key.
pub fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;
    for c in key.chars() {
        if c.is_uppercase() {
            if previous.is_some_and(|p| p != '.') {
                out.push('.');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}

impl Resolver for DotResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        if key.trim().is_empty() {
            return Ok(Vec::new());
        }
        let key = canonical_key(key);
        tracing::trace!(key = %key, "Resolving key");
        self.next.resolve(&key)
    }
}

resolver_plugin!(DotResolver);
