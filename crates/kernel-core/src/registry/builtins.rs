//! Built-in implementation registrations

use super::Implementation;
use crate::config::{
    AppendResolver, DotResolver, EnvironmentResolver, FileResolver, ListResolver,
    OverrideResolver, PrependResolver, PropertiesResolver, ReferenceResolver, RemoveResolver,
    ReplaceResolver, SystemResolver,
};
use crate::plugin::{Capability, Plugin};
use crate::{Result, context::Context};

/// The value-resolution capability.
pub const RESOLVER: Capability = Capability::new("Resolver");

/// Number of built-in implementations.
pub const BUILTIN_COUNT: usize = 12;

fn resolver<P, F>(type_name: &str, order: i32, factory: F) -> Implementation
where
    F: Fn(&Context) -> Result<P> + Send + Sync + 'static,
    P: Plugin,
{
    Implementation::new(RESOLVER, type_name, factory).with_order(order)
}

/// All built-in resolver stages with their chain orders.
pub fn builtin_implementations() -> Vec<Implementation> {
    vec![
        resolver("DotResolver", 10, |_| Ok(DotResolver::new())),
        resolver("RemoveResolver", 100, |_| Ok(RemoveResolver::new())),
        resolver("ReplaceResolver", 110, |_| Ok(ReplaceResolver::new())),
        resolver("PrependResolver", 120, |_| Ok(PrependResolver::new())),
        resolver("AppendResolver", 130, |_| Ok(AppendResolver::new())),
        resolver("ReferenceResolver", 140, |_| Ok(ReferenceResolver::new())),
        resolver("FileResolver", 150, |ctx| {
            Ok(FileResolver::new(ctx.resources()))
        }),
        resolver("ListResolver", 160, |_| Ok(ListResolver::new())),
        resolver("OverrideResolver", 170, |_| Ok(OverrideResolver::new())),
        resolver("EnvironmentResolver", 200, |ctx| {
            Ok(EnvironmentResolver::new(ctx.environment()))
        }),
        resolver("SystemResolver", 210, |ctx| {
            Ok(SystemResolver::new(ctx.overrides()))
        }),
        resolver("PropertiesResolver", 300, |ctx| {
            PropertiesResolver::load(ctx.resources())
        }),
    ]
}
