//! Kernel bootstrap and public entry point
//!
//! Bootstrapping runs in three steps:
//!
//! 1. The default resolution pipeline is built straight from the registry,
//!    using the stage list in the bundled `kernel.properties`.
//! 2. The assembly chain is built from the stages named by the `assembler`
//!    key, resolved through that default pipeline.
//! 3. `Resolver` is created through the assembly chain, so a pipeline edited
//!    in configuration (`resolver-=environment`) replaces the default one.

use crate::assembly::{
    Assembler, Downstream, Request, StageContext, StageRegistration, build_chain, builtin_stages,
    compose,
};
use crate::config::{EmptyResolver, Resolver, ResolverCell};
use crate::context::Context;
use crate::plugin::{Capability, Component, Kind, Object};
use crate::registry::{Implementation, RESOLVER, Registry};
use crate::{Error, Result};
use kernel_resource::{
    DirectorySearchPath, InlineResources, LayeredSearchPath, OverrideProperties,
    ProcessEnvironment, Properties, PropertySource, ResourceSearchPath,
};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Defaults shipped with the kernel, loaded before every other
/// `kernel.properties`.
pub const BUNDLED_PROPERTIES: &str = include_str!("../resources/kernel.properties");

/// Location label of the bundled defaults.
pub const BUNDLED_LOCATION: &str = "bundled/kernel.properties";

/// Key naming the assembly stages.
pub const ASSEMBLER_KEY: &str = "assembler";

/// Key naming the resolution stages.
pub const RESOLVER_KEY: &str = "resolver";

fn bundled_list(key: &str) -> Result<Vec<String>> {
    let properties = Properties::parse(BUNDLED_LOCATION, BUNDLED_PROPERTIES)?;
    Ok(properties
        .get(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

/// Configures and bootstraps a [`Kernel`].
pub struct KernelBuilder {
    resources: Option<Arc<dyn ResourceSearchPath>>,
    environment: Arc<dyn PropertySource>,
    overrides: Arc<dyn PropertySource>,
    registry: Registry,
    stages: Vec<StageRegistration>,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self {
            resources: None,
            environment: Arc::new(ProcessEnvironment),
            overrides: Arc::new(OverrideProperties::new()),
            registry: Registry::with_builtins(),
            stages: builtin_stages(),
        }
    }

    /// Search path consulted after the bundled defaults.
    ///
    /// Defaults to the current directory and the user config directory.
    pub fn resources(mut self, resources: Arc<dyn ResourceSearchPath>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Source for the environment resolution stage.
    pub fn environment(mut self, environment: Arc<dyn PropertySource>) -> Self {
        self.environment = environment;
        self
    }

    /// Source for the override resolution stage.
    pub fn overrides(mut self, overrides: Arc<dyn PropertySource>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Register an additional implementation.
    pub fn register(mut self, implementation: Implementation) -> Self {
        self.registry.register(implementation);
        self
    }

    /// Make an additional assembly stage available to the `assembler` key.
    ///
    /// A stage registered under a built-in name replaces the built-in.
    pub fn stage(mut self, registration: StageRegistration) -> Self {
        self.stages.push(registration);
        self
    }

    pub fn build(self) -> Result<Kernel> {
        let user: Arc<dyn ResourceSearchPath> = match self.resources {
            Some(resources) => resources,
            None => Arc::new(DirectorySearchPath::discover()),
        };
        let bundled = InlineResources::new().with_located(
            crate::config::DEFAULT_PROPERTIES,
            BUNDLED_LOCATION,
            BUNDLED_PROPERTIES,
        );
        let resources = LayeredSearchPath::new()
            .with_layer(Arc::new(bundled))
            .with_layer(user);
        let context = Context::new(Arc::new(resources), self.environment, self.overrides);
        let registry = Arc::new(self.registry);

        let bootstrap = default_pipeline(&registry, &context)?;
        let head = match compose(bootstrap.clone())? {
            Some(head) => head.resolver().ok_or_else(|| Error::NotLinkable {
                implementation: head.implementation().type_name.clone(),
            })?,
            None => Arc::new(EmptyResolver),
        };
        let resolver = ResolverCell::new(head);

        let stages = Arc::new(StageContext::new(
            Arc::clone(&registry),
            context,
            resolver.clone(),
        ));
        let names = resolver.resolve(ASSEMBLER_KEY)?;
        let root = build_chain(&stages, &self.stages, &names)?;
        if let Some(root) = &root {
            stages.set_root(root);
        }

        let kernel = Kernel {
            registry,
            resolver,
            stages,
            root,
            bootstrap,
            closed: AtomicBool::new(false),
        };
        kernel.create(&Kind::Capability(RESOLVER))?;
        tracing::debug!(
            implementations = kernel.registry.len(),
            stages = ?names,
            "Kernel ready"
        );
        Ok(kernel)
    }
}

impl Default for KernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Instantiate the bundled resolver stages directly from the registry.
fn default_pipeline(registry: &Registry, context: &Context) -> Result<Vec<Component>> {
    let mut components = Vec::new();
    for name in bundled_list(RESOLVER_KEY)? {
        let component = registry.find(&RESOLVER, &name)?.instantiate(context)?;
        let accepted = match component.plugin().as_lifecycle() {
            Some(lifecycle) => lifecycle.init()?,
            None => true,
        };
        if accepted {
            components.push(component);
        } else {
            tracing::debug!(stage = %name, "Lifecycle check declined default stage");
        }
    }
    Ok(components)
}

/// A bootstrapped plugin kernel.
///
/// Closed on drop if [`close`](Self::close) was not called.
pub struct Kernel {
    registry: Arc<Registry>,
    resolver: ResolverCell,
    stages: Arc<StageContext>,
    root: Option<Arc<dyn Assembler>>,
    bootstrap: Vec<Component>,
    closed: AtomicBool,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Bootstrap with every default.
    pub fn new() -> Result<Self> {
        KernelBuilder::new().build()
    }

    fn root(&self) -> Downstream {
        Downstream::new(self.root.clone())
    }

    /// Assemble `kind` from its default configuration key.
    pub fn create(&self, kind: &Kind) -> Result<Option<Object>> {
        self.root().assemble(kind, Request::Keys(&[]))
    }

    /// Assemble `kind` from the first key with a non-empty value.
    pub fn create_from_keys<S: AsRef<str>>(
        &self,
        kind: &Kind,
        keys: &[S],
    ) -> Result<Option<Object>> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self.root().assemble(kind, Request::Keys(&keys))
    }

    /// Assemble `kind` from literal value tokens.
    pub fn create_with<S: AsRef<str>>(&self, kind: &Kind, tokens: &[S]) -> Result<Option<Object>> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        self.root().assemble(kind, Request::Tokens(&tokens))
    }

    /// The configured component for a capability, if any.
    pub fn component(&self, capability: &Capability) -> Result<Option<Component>> {
        Ok(self
            .create(&Kind::Capability(capability.clone()))?
            .and_then(Object::into_component))
    }

    /// Resolve a key through the active pipeline.
    pub fn resolve(&self, key: &str) -> Result<Vec<String>> {
        self.resolver.resolve(key)
    }

    /// The active resolution pipeline.
    pub fn resolver(&self) -> Arc<dyn Resolver> {
        self.resolver.get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn context(&self) -> &Context {
        self.stages.context()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close every tracked instance, then the default pipeline.
    ///
    /// Every instance is attempted; failures are reported together. Later
    /// calls do nothing.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut failures = Vec::new();
        match self.root().close() {
            Ok(()) => {}
            Err(Error::Teardown { failures: nested }) => failures.extend(nested),
            Err(e) => failures.push(e.to_string()),
        }
        for component in &self.bootstrap {
            let Some(teardown) = component.plugin().as_teardown() else {
                continue;
            };
            if let Err(e) = teardown.close() {
                let implementation = &component.implementation().type_name;
                tracing::warn!(implementation = %implementation, error = %e, "Teardown failed");
                failures.push(format!("{implementation}: {e}"));
            }
        }

        if failures.is_empty() {
            tracing::debug!("Kernel closed");
            Ok(())
        } else {
            Err(Error::Teardown { failures })
        }
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "Kernel dropped with teardown errors");
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("registry", &self.registry)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
