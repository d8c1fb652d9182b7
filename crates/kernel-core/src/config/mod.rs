//! Value Resolution Chain
//!
//! Each stage wraps a successor and answers `resolve(key)` with an ordered
//! list of tokens. Pre-filters rewrite the key before delegating, post-filters
//! rewrite the successor's result. Every stage is a plugin registered under
//! the `Resolver` capability, so the chain can be recomposed from
//! configuration like any other plugin chain.
//!
//! Operator keys (`key+`, `key^`, `key~`, `key-`) hold incremental edits to
//! the value list of `key`:
//!
//! ```text
//! filters=trace,aaa
//! filters+=trace:zzz   # [trace, zzz, aaa]
//! filters^=first       # [first, trace, zzz, aaa]
//! filters-=aaa         # [first, trace, zzz]
//! ```

use crate::chain::Successor;
use crate::plugin::Component;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Implement `Linkable` and `Plugin` for a stage whose only contract is being
/// a linked resolver.
macro_rules! resolver_plugin {
    ($stage:ty) => {
        impl $crate::plugin::Linkable for $stage {
            fn link(&self, next: $crate::plugin::Component) -> $crate::Result<()> {
                self.next.link(next)
            }
        }

        impl $crate::plugin::Plugin for $stage {
            fn as_linkable(&self) -> Option<&dyn $crate::plugin::Linkable> {
                Some(self)
            }

            fn into_resolver(
                self: std::sync::Arc<Self>,
            ) -> Option<std::sync::Arc<dyn $crate::config::Resolver>> {
                Some(self)
            }
        }
    };
}

mod dot;
mod environment;
mod file;
mod list;
mod operator;
mod overrides;
mod properties;
mod reference;
mod remove;
mod replace;
mod splice;

pub use dot::{DotResolver, canonical_key};
pub use environment::{EnvironmentResolver, SystemResolver};
pub use file::{FILE_SIGIL, FileResolver};
pub use list::ListResolver;
pub use operator::{Anchors, is_simple_key};
pub use overrides::OverrideResolver;
pub use properties::{DEFAULT_PROPERTIES, PropertiesResolver};
pub use reference::{REFERENCE_SIGIL, ReferenceResolver};
pub use remove::RemoveResolver;
pub use replace::ReplaceResolver;
pub use splice::{AppendResolver, PrependResolver};

/// Resolve a configuration key to an ordered list of tokens.
///
/// An absent key yields an empty list, never an error.
pub trait Resolver: Send + Sync {
    fn resolve(&self, key: &str) -> Result<Vec<String>>;
}

impl Successor<dyn Resolver> {
    /// Delegate to the successor; an unlinked tail resolves to nothing.
    pub fn resolve(&self, key: &str) -> Result<Vec<String>> {
        match self.get() {
            Some(next) => next.resolve(key),
            None => Ok(Vec::new()),
        }
    }

    /// Link a component exposing the resolver capability.
    pub fn link(&self, next: Component) -> Result<()> {
        let resolver = next.resolver().ok_or_else(|| Error::NotLinkable {
            implementation: next.implementation().type_name.clone(),
        })?;
        self.set(resolver);
        Ok(())
    }
}

/// A resolver with nothing behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl Resolver for EmptyResolver {
    fn resolve(&self, _key: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// The active resolution pipeline, shared and swappable.
#[derive(Clone)]
pub struct ResolverCell {
    active: Arc<RwLock<Arc<dyn Resolver>>>,
}

impl ResolverCell {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            active: Arc::new(RwLock::new(resolver)),
        }
    }

    /// The currently active pipeline.
    pub fn get(&self) -> Arc<dyn Resolver> {
        Arc::clone(&self.active.read())
    }

    /// Hot-swap the active pipeline, returning the previous one.
    pub fn replace(&self, resolver: Arc<dyn Resolver>) -> Arc<dyn Resolver> {
        std::mem::replace(&mut *self.active.write(), resolver)
    }
}

impl Resolver for ResolverCell {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let active = self.get();
        active.resolve(key)
    }
}

impl fmt::Debug for ResolverCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverCell").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixed-value resolvers for stage unit tests.

    use super::*;
    use std::collections::HashMap;

    /// Resolves from a fixed map; values are returned as given.
    #[derive(Default)]
    pub struct MapResolver {
        values: HashMap<String, Vec<String>>,
    }

    impl MapResolver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, key: &str, values: &[&str]) -> Self {
            self.values
                .entry(key.to_string())
                .or_default()
                .extend(values.iter().map(|v| v.to_string()));
            self
        }
    }

    impl Resolver for MapResolver {
        fn resolve(&self, key: &str) -> Result<Vec<String>> {
            Ok(self.values.get(key).cloned().unwrap_or_default())
        }
    }

    /// Link a stage directly to a resolver without going through components.
    pub fn successor(resolver: impl Resolver + 'static) -> Successor<dyn Resolver> {
        let next: Successor<dyn Resolver> = Successor::new();
        next.set(Arc::new(resolver));
        next
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MapResolver;
    use super::*;

    #[test]
    fn test_unlinked_successor_resolves_nothing() {
        let next: Successor<dyn Resolver> = Successor::new();
        assert!(next.resolve("anything").unwrap().is_empty());
    }

    #[test]
    fn test_cell_hot_swap() {
        let cell = ResolverCell::new(Arc::new(EmptyResolver));
        assert!(cell.resolve("a").unwrap().is_empty());

        cell.replace(Arc::new(MapResolver::new().with("a", &["1"])));
        assert_eq!(cell.resolve("a").unwrap(), vec!["1"]);
    }
}
