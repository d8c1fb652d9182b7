use super::{Assembler, Downstream, Request, StageContext};
use crate::plugin::{Kind, Object};
use crate::{Error, Result};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static SHORT_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

/// Resolves a short name to a registered implementation and builds it.
pub struct LookupStage {
    ctx: Arc<StageContext>,
    next: Downstream,
}

impl LookupStage {
    pub fn new(ctx: Arc<StageContext>, next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            ctx,
            next: Downstream::new(next),
        }
    }
}

impl Assembler for LookupStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let (Kind::Capability(capability), Some(token)) = (kind, request.single_token()) else {
            return self.next.assemble(kind, request);
        };
        if !SHORT_NAME.is_match(token) {
            return self.next.assemble(kind, request);
        }

        let implementation = self.ctx.registry().find(capability, token)?;
        let component = implementation
            .instantiate(self.ctx.context())
            .map_err(|source| Error::Construction {
                capability: capability.to_string(),
                token: token.to_string(),
                source: Box::new(source),
            })?;
        tracing::debug!(
            capability = %capability,
            token,
            implementation = %implementation.type_name,
            "Constructed component"
        );
        Ok(Some(Object::Component(component)))
    }

    fn close(&self) -> Result<()> {
        self.next.close()
    }
}
