use super::{Resolver, is_simple_key};
use crate::Result;
use crate::chain::Successor;

/// Plain assignment: the last non-blank value wins.
///
/// Sources are ordered lowest priority first, so the last value is the
/// highest-priority assignment. Operator keys keep every value.
#[derive(Debug, Default)]
pub struct OverrideResolver {
    next: Successor<dyn Resolver>,
}

impl OverrideResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for OverrideResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let values = self.next.resolve(key)?;
        if !is_simple_key(key) {
            return Ok(values);
        }
        Ok(values
            .into_iter()
            .rfind(|v| !v.trim().is_empty())
            .into_iter()
            .collect())
    }
}

resolver_plugin!(OverrideResolver);

#[cfg(test)]
mod tests {
    use super::super::testing::{MapResolver, successor};
    use super::*;
    use pretty_assertions::assert_eq;

    fn stage(map: MapResolver) -> OverrideResolver {
        OverrideResolver {
            next: successor(map),
        }
    }

    #[test]
    fn test_last_non_blank_wins() {
        let stage = stage(MapResolver::new().with("a", &["1", "2", "  "]));
        assert_eq!(stage.resolve("a").unwrap(), vec!["2"]);
    }

    #[test]
    fn test_absent_key_stays_empty() {
        let stage = stage(MapResolver::new());
        assert!(stage.resolve("a").unwrap().is_empty());
    }

    #[test]
    fn test_operator_keys_keep_all_values() {
        let stage = stage(MapResolver::new().with("a+", &["1", "2"]));
        assert_eq!(stage.resolve("a+").unwrap(), vec!["1", "2"]);
    }
}
