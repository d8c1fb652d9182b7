//! Services handed to plugin factories

use kernel_resource::{
    InlineResources, OverrideProperties, ProcessEnvironment, PropertySource, ResourceSearchPath,
};
use std::fmt;
use std::sync::Arc;

/// External collaborators of the kernel, passed explicitly.
#[derive(Clone)]
pub struct Context {
    resources: Arc<dyn ResourceSearchPath>,
    environment: Arc<dyn PropertySource>,
    overrides: Arc<dyn PropertySource>,
}

impl Context {
    pub fn new(
        resources: Arc<dyn ResourceSearchPath>,
        environment: Arc<dyn PropertySource>,
        overrides: Arc<dyn PropertySource>,
    ) -> Self {
        Self {
            resources,
            environment,
            overrides,
        }
    }

    /// In-memory resources, process environment, no overrides.
    pub fn with_resources(resources: Arc<dyn ResourceSearchPath>) -> Self {
        Self::new(
            resources,
            Arc::new(ProcessEnvironment),
            Arc::new(OverrideProperties::new()),
        )
    }

    pub fn resources(&self) -> Arc<dyn ResourceSearchPath> {
        Arc::clone(&self.resources)
    }

    pub fn environment(&self) -> Arc<dyn PropertySource> {
        Arc::clone(&self.environment)
    }

    pub fn overrides(&self) -> Arc<dyn PropertySource> {
        Arc::clone(&self.overrides)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::with_resources(Arc::new(InlineResources::new()))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}
