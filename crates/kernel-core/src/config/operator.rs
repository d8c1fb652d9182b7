//! Shared parsing for operator keys

use super::Resolver;
use crate::chain::Successor;
use crate::{Error, Result};
use std::collections::BTreeMap;

pub(crate) const ANCHOR: char = ':';

/// Values grouped by anchor token; the empty anchor holds unanchored values.
pub type Anchors = BTreeMap<String, Vec<String>>;

/// A key that is not itself an operator key (`a.b`, not `a.b+`).
pub fn is_simple_key(key: &str) -> bool {
    key.chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

/// Resolve an operator key and group its `anchor:value` entries.
///
/// Blank unanchored entries are skipped; an anchor with nothing after the
/// `:` (`trace:`) is a syntax error.
pub(crate) fn index(next: &Successor<dyn Resolver>, key: &str) -> Result<Anchors> {
    let mut anchors = Anchors::new();
    for entry in next.resolve(key)? {
        let (anchor, value) = match entry.split_once(ANCHOR) {
            Some((anchor, value)) => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(Error::syntax(
                        key,
                        &entry,
                        "positional value after `:` is empty",
                    ));
                }
                (anchor.trim(), value)
            }
            None => ("", entry.trim()),
        };
        if !value.is_empty() {
            anchors
                .entry(anchor.to_string())
                .or_default()
                .push(value.to_string());
        }
    }
    Ok(anchors)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MapResolver, successor};
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("filters", true)]
    #[case("a.b2", true)]
    #[case("filters+", false)]
    #[case("filters^", false)]
    #[case("filters~", false)]
    #[case("filters-", false)]
    #[case("", false)]
    fn test_is_simple_key(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_simple_key(key), expected);
    }

    #[test]
    fn test_index_groups_by_anchor() {
        let next = successor(MapResolver::new().with("f+", &["x", "trace: y", "trace:z", " "]));
        let anchors = index(&next, "f+").unwrap();

        let expected: Anchors = [
            (String::new(), vec!["x".to_string()]),
            ("trace".to_string(), vec!["y".to_string(), "z".to_string()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(anchors, expected);
    }

    #[test]
    fn test_index_rejects_empty_positional_value() {
        let next = successor(MapResolver::new().with("f+", &["trace:x", "trace:"]));
        match index(&next, "f+") {
            Err(Error::Syntax { key, value, .. }) => {
                assert_eq!(key, "f+");
                assert_eq!(value, "trace:");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
