use super::Resolver;
use super::operator::ANCHOR;
use crate::chain::Successor;
use crate::{Error, Result};

/// Marks a token naming another key: `output.encoding=$input.encoding`.
pub const REFERENCE_SIGIL: char = '$';

/// Substitutes `$key` tokens with the values of `key`, depth-first.
///
/// Either side of an `anchor:value` pair may be a reference
/// (`filters~=$trace:$mytrace`); when both are, every combination is
/// produced. Visiting any key twice within one call is an error, so
/// `pair=$x,$x` is rejected just like `a=$b`, `b=$a`.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    next: Successor<dyn Resolver>,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve_history(&self, key: &str, history: &mut Vec<String>) -> Result<Vec<String>> {
        if history.iter().any(|visited| visited == key) {
            let mut chain = history.clone();
            chain.push(key.to_string());
            return Err(Error::CircularReference { chain });
        }

        history.push(key.to_string());
        let mut out = Vec::new();
        for value in self.next.resolve(key)? {
            out.extend(self.dereference(&value, history)?);
        }
        Ok(out)
    }

    fn dereference(&self, value: &str, history: &mut Vec<String>) -> Result<Vec<String>> {
        if let Some((head, tail)) = value.split_once(ANCHOR) {
            let head = head.trim();
            let tail = tail.trim();
            let head_ref = head.strip_prefix(REFERENCE_SIGIL);
            let tail_ref = tail.strip_prefix(REFERENCE_SIGIL);
            if head_ref.is_none() && tail_ref.is_none() {
                return Ok(vec![value.to_string()]);
            }

            let heads = match head_ref {
                Some(name) => self.resolve_history(name, history)?,
                None => vec![head.to_string()],
            };
            // With both sides referenced the tail gets its own copy of the history.
            let tails = match (head_ref, tail_ref) {
                (Some(_), Some(name)) => self.resolve_history(name, &mut history.clone())?,
                (None, Some(name)) => self.resolve_history(name, history)?,
                (_, None) => vec![tail.to_string()],
            };
            return Ok(heads
                .iter()
                .flat_map(|h| tails.iter().map(move |t| format!("{h}{ANCHOR}{t}")))
                .collect());
        }

        match value.strip_prefix(REFERENCE_SIGIL) {
            Some(name) => self.resolve_history(name, history),
            None => Ok(vec![value.to_string()]),
        }
    }
}

impl Resolver for ReferenceResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        self.resolve_history(key, &mut Vec::new())
    }
}

resolver_plugin!(ReferenceResolver);

#[cfg(test)]
mod tests {
    use super::super::testing::{MapResolver, successor};
    use super::*;
    use pretty_assertions::assert_eq;

    fn stage(map: MapResolver) -> ReferenceResolver {
        ReferenceResolver {
            next: successor(map),
        }
    }

    #[test]
    fn test_substitutes_transitively() {
        let stage = stage(
            MapResolver::new()
                .with("input.encoding", &["UTF-8"])
                .with("default.encoding", &["$input.encoding"])
                .with("output.encoding", &["$default.encoding", "ASCII"]),
        );
        assert_eq!(
            stage.resolve("output.encoding").unwrap(),
            vec!["UTF-8", "ASCII"]
        );
    }

    #[test]
    fn test_anchor_pairs_cross_product() {
        let stage = stage(
            MapResolver::new()
                .with("trace", &["t1", "t2"])
                .with("mytrace", &["m1", "m2"])
                .with("filters~", &["$trace:$mytrace", "plain:$mytrace", "a:b"]),
        );
        assert_eq!(
            stage.resolve("filters~").unwrap(),
            vec![
                "t1:m1", "t1:m2", "t2:m1", "t2:m2", "plain:m1", "plain:m2", "a:b"
            ]
        );
    }

    #[test]
    fn test_cycle_names_full_chain() {
        let stage = stage(MapResolver::new().with("a", &["$b"]).with("b", &["$a"]));
        match stage.resolve("a") {
            Err(Error::CircularReference { chain }) => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_sibling_references_to_one_key_are_a_cycle() {
        let stage = stage(
            MapResolver::new()
                .with("x", &["1"])
                .with("pair", &["$x", "$x"]),
        );
        match stage.resolve("pair") {
            Err(Error::CircularReference { chain }) => {
                assert_eq!(chain, vec!["pair", "x", "x"])
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_distinct_sibling_references_resolve() {
        let stage = stage(
            MapResolver::new()
                .with("x", &["1"])
                .with("y", &["2"])
                .with("pair", &["$x", "$y"]),
        );
        assert_eq!(stage.resolve("pair").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let stage = stage(MapResolver::new().with("a", &["$a"]));
        assert!(matches!(
            stage.resolve("a"),
            Err(Error::CircularReference { .. })
        ));
    }
}
