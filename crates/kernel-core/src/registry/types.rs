//! Implementation descriptors

use crate::Result;
use crate::context::Context;
use crate::plugin::{Capability, Component, Plugin};
use std::fmt;
use std::sync::Arc;

/// Builds a fresh plugin instance.
pub type Factory = Arc<dyn Fn(&Context) -> Result<Arc<dyn Plugin>> + Send + Sync>;

/// A known implementation of a capability.
#[derive(Clone)]
pub struct Implementation {
    /// Capability implemented
    pub capability: Capability,
    /// Unqualified implementation name (e.g., "RacingCar")
    pub type_name: String,
    /// Explicit short name, if declared
    pub name: Option<String>,
    /// Explicit chain order, if declared
    pub order: Option<i32>,
    factory: Factory,
}

impl Implementation {
    pub fn new<F, P>(capability: Capability, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Context) -> Result<P> + Send + Sync + 'static,
        P: Plugin,
    {
        Self {
            capability,
            type_name: type_name.into(),
            name: None,
            order: None,
            factory: Arc::new(move |ctx: &Context| Ok(Arc::new(factory(ctx)?) as Arc<dyn Plugin>)),
        }
    }

    /// Set the declared short name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the declared order (builder pattern).
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Name used when enumerating implementations: the declared name, else
    /// the type name without the capability suffix (`RacingCar` -> `Racing`),
    /// else the full type name.
    pub fn spi_name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        let suffix = self.capability.name();
        match self.type_name.strip_suffix(suffix) {
            Some(stem) if !stem.is_empty() => stem,
            _ => &self.type_name,
        }
    }

    /// Whether a short token selects this implementation.
    pub fn matches(&self, token: &str) -> bool {
        if self.type_name.eq_ignore_ascii_case(token) {
            return true;
        }
        let qualified = format!("{token}{}", self.capability.name());
        if self.type_name.eq_ignore_ascii_case(&qualified) {
            return true;
        }
        self.name.as_deref() == Some(token)
    }

    /// Build a fresh instance.
    pub fn instantiate(self: &Arc<Self>, ctx: &Context) -> Result<Component> {
        let plugin = (self.factory)(ctx)?;
        Ok(Component::new(Arc::clone(self), plugin))
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("capability", &self.capability)
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
