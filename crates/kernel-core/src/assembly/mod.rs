//! Object Assembly Chain
//!
//! Each stage answers `assemble(kind, request)` with an optional value and
//! passes what it does not handle to its successor. Stages are declared as
//! [`StageRegistration`]s, selected and ordered by configuration, and folded
//! tail-first into nested delegation.
//!
//! | Stage      | Order | Handles                                              |
//! |------------|-------|------------------------------------------------------|
//! | `config`   | 10    | keys -> tokens through the active resolver           |
//! | `wildcard` | 20    | `*` -> every known implementation name               |
//! | `chain`    | 30    | several tokens for one capability -> linked chain    |
//! | `array`    | 100   | one element per token                                |
//! | `literal`  | 200   | strings, URIs and scalars                            |
//! | `teardown` | 220   | tracks instances to close at shutdown                |
//! | `inject`   | 230   | singleton cache, property injection, lifecycle check |
//! | `lookup`   | 300   | short name -> registry implementation                |

mod array;
mod chain;
mod config;
mod inject;
mod literal;
mod lookup;
mod stages;
mod teardown;
mod wildcard;

pub use array::ArrayStage;
pub use chain::{ChainStage, compose, order_of};
pub use config::ConfigStage;
pub use inject::InjectStage;
pub use literal::{LiteralStage, parse_literal};
pub use lookup::LookupStage;
pub use stages::{StageRegistration, build_chain, builtin_stages};
pub use teardown::TeardownStage;
pub use wildcard::{WILDCARD, WildcardStage};

use crate::config::ResolverCell;
use crate::context::Context;
use crate::plugin::{Kind, Object};
use crate::registry::Registry;
use crate::{Error, Result};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// What the caller supplies alongside the requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// Configuration keys to resolve; empty means "derive from the kind".
    Keys(&'a [String]),
    /// Literal value tokens.
    Tokens(&'a [String]),
}

impl<'a> Request<'a> {
    pub fn values(&self) -> &'a [String] {
        match *self {
            Request::Keys(values) | Request::Tokens(values) => values,
        }
    }

    /// The tokens of a `Tokens` request.
    pub fn tokens(&self) -> Option<&'a [String]> {
        match *self {
            Request::Tokens(tokens) => Some(tokens),
            Request::Keys(_) => None,
        }
    }

    /// The only token of a single-token request.
    pub fn single_token(&self) -> Option<&'a str> {
        match *self {
            Request::Tokens([token]) => Some(token.as_str()),
            _ => None,
        }
    }
}

/// One stage of the assembly chain.
pub trait Assembler: Send + Sync {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>>;

    /// Release what this stage and its successors hold.
    fn close(&self) -> Result<()>;
}

/// The successor of a stage; the end of the chain rejects leftover input.
#[derive(Clone, Default)]
pub struct Downstream {
    next: Option<Arc<dyn Assembler>>,
}

impl Downstream {
    pub fn new(next: Option<Arc<dyn Assembler>>) -> Self {
        Self { next }
    }

    pub fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        match &self.next {
            Some(next) => next.assemble(kind, request),
            None if request.values().is_empty() => Ok(None),
            None => Err(Error::Unhandled {
                kind: kind.to_string(),
                values: request.values().to_vec(),
            }),
        }
    }

    pub fn close(&self) -> Result<()> {
        match &self.next {
            Some(next) => next.close(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Downstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downstream")
            .field("linked", &self.next.is_some())
            .finish()
    }
}

/// Shared services for assembly stages.
pub struct StageContext {
    registry: Arc<Registry>,
    context: Context,
    resolver: ResolverCell,
    root: OnceLock<Weak<dyn Assembler>>,
}

impl StageContext {
    pub fn new(registry: Arc<Registry>, context: Context, resolver: ResolverCell) -> Self {
        Self {
            registry,
            context,
            resolver,
            root: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn resolver(&self) -> &ResolverCell {
        &self.resolver
    }

    /// Head of the assembled chain, once it has been built.
    pub fn root(&self) -> Option<Arc<dyn Assembler>> {
        self.root.get().and_then(Weak::upgrade)
    }

    /// Record the head of the chain. Only the first call has an effect.
    pub fn set_root(&self, root: &Arc<dyn Assembler>) {
        let _ = self.root.set(Arc::downgrade(root));
    }
}

impl fmt::Debug for StageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageContext")
            .field("registry", &self.registry)
            .field("has_root", &self.root.get().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures for stage unit tests.

    use super::*;
    use crate::config::Resolver;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Resolves from a fixed map of already-split tokens.
    #[derive(Default)]
    pub struct FixedResolver {
        values: HashMap<String, Vec<String>>,
    }

    impl FixedResolver {
        pub fn with(mut self, key: &str, values: &[&str]) -> Self {
            self.values.insert(
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            );
            self
        }
    }

    impl Resolver for FixedResolver {
        fn resolve(&self, key: &str) -> Result<Vec<String>> {
            Ok(self.values.get(key).cloned().unwrap_or_default())
        }
    }

    pub fn stage_context(registry: Registry, resolver: FixedResolver) -> Arc<StageContext> {
        Arc::new(StageContext::new(
            Arc::new(registry),
            Context::default(),
            ResolverCell::new(Arc::new(resolver)),
        ))
    }

    /// Terminal stage recording every request it receives.
    #[derive(Default)]
    pub struct Recorder {
        pub seen: Mutex<Vec<(String, Vec<String>)>>,
        pub closed: Mutex<usize>,
    }

    impl Assembler for Recorder {
        fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
            self.seen
                .lock()
                .push((kind.to_string(), request.values().to_vec()));
            Ok(Some(Object::String(request.values().join("|"))))
        }

        fn close(&self) -> Result<()> {
            *self.closed.lock() += 1;
            Ok(())
        }
    }

    pub fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }
}
