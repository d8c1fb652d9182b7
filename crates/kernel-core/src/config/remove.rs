use super::{Resolver, is_simple_key};
use crate::Result;
use crate::chain::Successor;
use std::collections::HashSet;

/// `key-=a,b` drops `a` and `b` from the value list of `key`.
#[derive(Debug, Default)]
pub struct RemoveResolver {
    next: Successor<dyn Resolver>,
}

impl RemoveResolver {
    pub const OPERATOR: char = '-';

    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for RemoveResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let mut values = self.next.resolve(key)?;
        if !is_simple_key(key) {
            return Ok(values);
        }
        let removed: HashSet<String> = self
            .next
            .resolve(&format!("{key}{}", Self::OPERATOR))?
            .into_iter()
            .map(|v| v.trim().to_string())
            .collect();
        if !removed.is_empty() {
            values.retain(|v| !removed.contains(v));
        }
        Ok(values)
    }
}

resolver_plugin!(RemoveResolver);

#[cfg(test)]
mod tests {
    use super::super::testing::{MapResolver, successor};
    use super::*;
    use pretty_assertions::assert_eq;

    fn stage(map: MapResolver) -> RemoveResolver {
        RemoveResolver {
            next: successor(map),
        }
    }

    #[test]
    fn test_removes_every_occurrence() {
        let stage = stage(
            MapResolver::new()
                .with("filters", &["trace", "aaa", "trace", "bbb"])
                .with("filters-", &["trace"]),
        );
        assert_eq!(stage.resolve("filters").unwrap(), vec!["aaa", "bbb"]);
    }

    #[test]
    fn test_operator_keys_pass_through() {
        let stage = stage(
            MapResolver::new()
                .with("filters+", &["x"])
                .with("filters+-", &["x"]),
        );
        assert_eq!(stage.resolve("filters+").unwrap(), vec!["x"]);
    }
}
