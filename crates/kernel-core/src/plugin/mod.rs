//! Plugin contracts and the assembled value model
//!
//! A plugin opts into each small contract by returning `Some(self)` from the
//! matching accessor on [`Plugin`]. The assembly chain only ever talks to
//! plugins through these accessors.

mod kind;
mod object;

pub use kind::{Capability, Kind};
pub use object::{Component, Object};

use crate::Result;
use crate::config::Resolver;
use std::any::Any;
use std::sync::Arc;

/// Upcast to [`Any`] for concrete access to a plugin.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A constructible extension.
pub trait Plugin: AsAny + Send + Sync {
    fn as_linkable(&self) -> Option<&dyn Linkable> {
        None
    }

    fn as_prioritized(&self) -> Option<&dyn Prioritized> {
        None
    }

    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        None
    }

    fn as_teardown(&self) -> Option<&dyn Teardown> {
        None
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }

    /// Expose this instance as a value resolver.
    fn into_resolver(self: Arc<Self>) -> Option<Arc<dyn Resolver>> {
        None
    }
}

/// Accepts a successor of the same capability.
pub trait Linkable {
    fn link(&self, next: Component) -> Result<()>;
}

/// Position within a composed chain; lower runs earlier.
pub trait Prioritized {
    fn priority(&self) -> i32;
}

/// Post-injection check. Returning `false` discards the instance.
pub trait Lifecycle {
    fn init(&self) -> Result<bool>;
}

/// Release held resources at shutdown.
pub trait Teardown {
    fn close(&self) -> Result<()>;
}

/// A settable property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Dot-case name, also the configuration key suffix.
    pub name: String,
    pub kind: Kind,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Exposes settable properties for injection.
pub trait Configurable {
    fn properties(&self) -> Vec<Property>;

    fn set(&self, name: &str, value: Object) -> Result<()>;
}
