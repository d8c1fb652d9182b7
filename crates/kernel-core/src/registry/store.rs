//! Discovery registry storage

use super::Implementation;
use crate::plugin::Capability;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Known implementations per capability, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    implementations: HashMap<Capability, Vec<Arc<Implementation>>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in resolver stages.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for implementation in super::builtins::builtin_implementations() {
            registry.register(implementation);
        }
        registry
    }

    /// Register an implementation after any existing ones.
    pub fn register(&mut self, implementation: Implementation) {
        self.implementations
            .entry(implementation.capability.clone())
            .or_default()
            .push(Arc::new(implementation));
    }

    /// All implementations of a capability, in registration order.
    pub fn implementations(&self, capability: &Capability) -> &[Arc<Implementation>] {
        self.implementations
            .get(capability)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Enumeration names of every implementation of a capability.
    pub fn names(&self, capability: &Capability) -> Vec<String> {
        self.implementations(capability)
            .iter()
            .map(|imp| imp.spi_name().to_string())
            .collect()
    }

    /// The single implementation of `capability` selected by `token`.
    pub fn find(&self, capability: &Capability, token: &str) -> Result<Arc<Implementation>> {
        let candidates: Vec<_> = self
            .implementations(capability)
            .iter()
            .filter(|imp| imp.matches(token))
            .collect();

        match candidates.as_slice() {
            [] => Err(Error::NoSuchImplementation {
                capability: capability.to_string(),
                token: token.to_string(),
            }),
            [single] => Ok(Arc::clone(single)),
            many => Err(Error::AmbiguousImplementation {
                capability: capability.to_string(),
                token: token.to_string(),
                candidates: many.iter().map(|imp| imp.type_name.clone()).collect(),
            }),
        }
    }

    /// Check if any implementation of a capability is registered.
    pub fn contains(&self, capability: &Capability) -> bool {
        !self.implementations(capability).is_empty()
    }

    /// Total number of registered implementations.
    pub fn len(&self) -> usize {
        self.implementations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered capabilities (sorted by name).
    pub fn capabilities(&self) -> Vec<&Capability> {
        let mut capabilities: Vec<_> = self.implementations.keys().collect();
        capabilities.sort();
        capabilities
    }
}
