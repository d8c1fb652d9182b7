//! Declarative stage registrations

use super::{
    ArrayStage, Assembler, ChainStage, ConfigStage, InjectStage, LiteralStage, LookupStage,
    StageContext, TeardownStage, WildcardStage,
};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Builds a stage in front of an already-built successor.
pub type StageBuilder =
    Arc<dyn Fn(&Arc<StageContext>, Option<Arc<dyn Assembler>>) -> Arc<dyn Assembler> + Send + Sync>;

/// A named assembly stage with its chain order.
#[derive(Clone)]
pub struct StageRegistration {
    /// Name used in the `assembler` configuration key
    pub name: String,
    /// Position in the chain (lower = closer to the head)
    pub order: i32,
    build: StageBuilder,
}

impl StageRegistration {
    pub fn new<F>(name: impl Into<String>, order: i32, build: F) -> Self
    where
        F: Fn(&Arc<StageContext>, Option<Arc<dyn Assembler>>) -> Arc<dyn Assembler>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            order,
            build: Arc::new(build),
        }
    }

    pub fn build(
        &self,
        ctx: &Arc<StageContext>,
        next: Option<Arc<dyn Assembler>>,
    ) -> Arc<dyn Assembler> {
        (self.build)(ctx, next)
    }
}

impl fmt::Debug for StageRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRegistration")
            .field("name", &self.name)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// The built-in stages.
pub fn builtin_stages() -> Vec<StageRegistration> {
    vec![
        StageRegistration::new("config", 10, |ctx, next| {
            Arc::new(ConfigStage::new(Arc::clone(ctx), next))
        }),
        StageRegistration::new("wildcard", 20, |ctx, next| {
            Arc::new(WildcardStage::new(Arc::clone(ctx), next))
        }),
        StageRegistration::new("chain", 30, |_, next| Arc::new(ChainStage::new(next))),
        StageRegistration::new("array", 100, |_, next| Arc::new(ArrayStage::new(next))),
        StageRegistration::new("literal", 200, |_, next| Arc::new(LiteralStage::new(next))),
        StageRegistration::new("teardown", 220, |_, next| {
            Arc::new(TeardownStage::new(next))
        }),
        StageRegistration::new("inject", 230, |ctx, next| {
            Arc::new(InjectStage::new(Arc::clone(ctx), next))
        }),
        StageRegistration::new("lookup", 300, |ctx, next| {
            Arc::new(LookupStage::new(Arc::clone(ctx), next))
        }),
    ]
}

/// Select stages by name, sort them by order and fold them into one chain.
///
/// Returns the head, or `None` when no stage is selected.
pub fn build_chain(
    ctx: &Arc<StageContext>,
    available: &[StageRegistration],
    names: &[String],
) -> Result<Option<Arc<dyn Assembler>>> {
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let registration = available
            .iter()
            .rev()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownStage { name: name.clone() })?;
        if !selected
            .iter()
            .any(|r: &&StageRegistration| r.name == registration.name)
        {
            selected.push(registration);
        }
    }
    selected.sort_by_key(|r| r.order);

    tracing::debug!(
        stages = ?selected.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        "Building assembly chain"
    );
    let head = selected
        .iter()
        .rev()
        .fold(None, |next, registration| Some(registration.build(ctx, next)));
    Ok(head)
}
