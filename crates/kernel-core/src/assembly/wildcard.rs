use super::{Assembler, Downstream, Request, StageContext};
use crate::plugin::{Kind, Object};
use crate::{Error, Result};
use std::sync::Arc;

/// Token standing for every known implementation of a capability.
pub const WILDCARD: &str = "*";

/// Expands `*` into the names of all registered implementations.
pub struct WildcardStage {
    ctx: Arc<StageContext>,
    next: Downstream,
}

impl WildcardStage {
    pub fn new(ctx: Arc<StageContext>, next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            ctx,
            next: Downstream::new(next),
        }
    }
}

impl Assembler for WildcardStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let Some(capability) = kind.target_capability() else {
            return self.next.assemble(kind, request);
        };
        let Some(tokens) = request.tokens() else {
            return self.next.assemble(kind, request);
        };
        if !tokens.iter().any(|token| token == WILDCARD) {
            return self.next.assemble(kind, request);
        }
        if tokens.len() != 1 {
            return Err(Error::WildcardNotSingle {
                kind: kind.to_string(),
                values: tokens.to_vec(),
            });
        }

        let names = self.ctx.registry().names(capability);
        tracing::debug!(capability = %capability, ?names, "Expanding wildcard");
        self.next.assemble(kind, Request::Tokens(&names))
    }

    fn close(&self) -> Result<()> {
        self.next.close()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{FixedResolver, Recorder, stage_context, strings};
    use super::*;
    use crate::plugin::{Capability, Plugin};
    use crate::registry::{Implementation, Registry};
    use pretty_assertions::assert_eq;

    const FILTER: Capability = Capability::new("Filter");

    struct Nothing;
    impl Plugin for Nothing {}

    fn stage() -> (WildcardStage, Arc<Recorder>) {
        let mut registry = Registry::new();
        registry.register(Implementation::new(FILTER, "TraceFilter", |_| Ok(Nothing)));
        registry.register(
            Implementation::new(FILTER, "AccessLogFilter", |_| Ok(Nothing)).with_name("log"),
        );
        let recorder = Arc::new(Recorder::default());
        let stage = WildcardStage::new(
            stage_context(registry, FixedResolver::default()),
            Some(recorder.clone() as Arc<dyn Assembler>),
        );
        (stage, recorder)
    }

    #[test]
    fn test_expands_to_spi_names() {
        let (stage, recorder) = stage();
        let tokens = strings(&["*"]);
        stage
            .assemble(&Kind::array(FILTER.into()), Request::Tokens(&tokens))
            .unwrap();
        assert_eq!(recorder.seen.lock()[0].1, strings(&["Trace", "log"]));
    }

    #[test]
    fn test_wildcard_must_be_alone() {
        let (stage, _) = stage();
        let tokens = strings(&["trace", "*"]);
        assert!(matches!(
            stage.assemble(&Kind::Capability(FILTER), Request::Tokens(&tokens)),
            Err(Error::WildcardNotSingle { .. })
        ));
    }

    #[test]
    fn test_non_capability_kinds_pass_through() {
        let (stage, recorder) = stage();
        let tokens = strings(&["*"]);
        stage.assemble(&Kind::String, Request::Tokens(&tokens)).unwrap();
        assert_eq!(recorder.seen.lock()[0].1, tokens);
    }
}
