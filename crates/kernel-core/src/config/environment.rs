//! Terminal stages backed by process-level property sources

use super::Resolver;
use crate::chain::Successor;
use crate::plugin::{Component, Configurable, Kind, Linkable, Object, Plugin, Property};
use crate::{Error, Result};
use kernel_resource::PropertySource;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

const PREFIX: &str = "prefix";

/// A property source consulted with an optional prefix, prefixed key first.
struct PrefixedSource {
    source: Arc<dyn PropertySource>,
    prefix: RwLock<Option<String>>,
}

impl PrefixedSource {
    fn new(source: Arc<dyn PropertySource>) -> Self {
        Self {
            source,
            prefix: RwLock::new(None),
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let prefixed = self
            .prefix
            .read()
            .as_deref()
            .filter(|p| !p.is_empty())
            .and_then(|p| self.source.property(&format!("{p}{key}")))
            .filter(|v| !v.is_empty());
        prefixed.or_else(|| self.source.property(key).filter(|v| !v.is_empty()))
    }

    fn properties(&self) -> Vec<Property> {
        vec![Property::new(PREFIX, Kind::String)]
    }

    fn set(&self, name: &str, value: Object) -> Result<()> {
        match (name, value) {
            (PREFIX, Object::String(prefix)) => {
                *self.prefix.write() = Some(prefix);
                Ok(())
            }
            (name, value) => Err(Error::plugin(format!(
                "unsupported property {name} = {value:?}"
            ))),
        }
    }
}

macro_rules! source_stage {
    ($(#[$doc:meta])* $stage:ident) => {
        $(#[$doc])*
        pub struct $stage {
            next: Successor<dyn Resolver>,
            source: PrefixedSource,
        }

        impl $stage {
            pub fn new(source: Arc<dyn PropertySource>) -> Self {
                Self {
                    next: Successor::new(),
                    source: PrefixedSource::new(source),
                }
            }

            /// Set the key prefix tried before the bare key.
            pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
                *self.source.prefix.write() = Some(prefix.into());
                self
            }
        }

        impl Resolver for $stage {
            fn resolve(&self, key: &str) -> Result<Vec<String>> {
                let mut values = self.next.resolve(key)?;
                values.extend(self.source.lookup(key));
                Ok(values)
            }
        }

        impl Linkable for $stage {
            fn link(&self, next: Component) -> Result<()> {
                self.next.link(next)
            }
        }

        impl Configurable for $stage {
            fn properties(&self) -> Vec<Property> {
                self.source.properties()
            }

            fn set(&self, name: &str, value: Object) -> Result<()> {
                self.source.set(name, value)
            }
        }

        impl Plugin for $stage {
            fn as_linkable(&self) -> Option<&dyn Linkable> {
                Some(self)
            }

            fn as_configurable(&self) -> Option<&dyn Configurable> {
                Some(self)
            }

            fn into_resolver(self: Arc<Self>) -> Option<Arc<dyn Resolver>> {
                Some(self)
            }
        }

        impl fmt::Debug for $stage {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($stage))
                    .field("prefix", &*self.source.prefix.read())
                    .finish_non_exhaustive()
            }
        }
    };
}

source_stage!(
    /// Appends the process environment value of a key after the successor's
    /// values, so it takes precedence under override.
    EnvironmentResolver
);

source_stage!(
    /// Appends the command-line override value of a key after the
    /// successor's values.
    SystemResolver
);
