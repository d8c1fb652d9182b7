use super::operator::index;
use super::{Resolver, is_simple_key};
use crate::chain::Successor;
use crate::{Error, Result};

/// `key~=old:new` expands every `old` in the value list of `key` into the
/// values declared for it.
#[derive(Debug, Default)]
pub struct ReplaceResolver {
    next: Successor<dyn Resolver>,
}

impl ReplaceResolver {
    pub const OPERATOR: char = '~';

    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for ReplaceResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let values = self.next.resolve(key)?;
        if !is_simple_key(key) {
            return Ok(values);
        }
        let operator_key = format!("{key}{}", Self::OPERATOR);
        let replacements = index(&self.next, &operator_key)?;
        if let Some(unanchored) = replacements.get("") {
            let value = unanchored.first().map(String::as_str).unwrap_or_default();
            return Err(Error::syntax(
                &operator_key,
                value,
                "replacement must be written as `old:new`",
            ));
        }
        if replacements.is_empty() {
            return Ok(values);
        }
        Ok(values
            .into_iter()
            .flat_map(|v| match replacements.get(&v) {
                Some(with) => with.clone(),
                None => vec![v],
            })
            .collect())
    }
}

resolver_plugin!(ReplaceResolver);
