use super::{Assembler, Downstream, Request, StageContext};
use crate::Result;
use crate::plugin::{Kind, Object};
use std::sync::Arc;

/// Bridges assembly to value resolution.
///
/// Turns a `Keys` request into tokens using the first key that resolves to
/// anything. An empty `Tokens` request falls back to the kind's default key.
/// A resolver built this way becomes the active pipeline.
pub struct ConfigStage {
    ctx: Arc<StageContext>,
    next: Downstream,
}

impl ConfigStage {
    pub fn new(ctx: Arc<StageContext>, next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            ctx,
            next: Downstream::new(next),
        }
    }

    fn first_configured(&self, kind: &Kind, keys: &[String]) -> Result<Option<Vec<String>>> {
        let default_key = kind.simple_name();
        let mut keys: Vec<&str> = keys
            .iter()
            .map(String::as_str)
            .filter(|key| !key.trim().is_empty())
            .collect();
        if keys.is_empty() {
            keys.push(&default_key);
        }

        let resolver = self.ctx.resolver().get();
        for key in keys {
            let values = resolver.resolve(key)?;
            if !values.is_empty() {
                tracing::trace!(key, kind = %kind, ?values, "Resolved configuration");
                return Ok(Some(values));
            }
        }
        Ok(None)
    }
}

impl Assembler for ConfigStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let keys: &[String] = match request {
            Request::Keys(keys) => keys,
            Request::Tokens([]) => &[],
            Request::Tokens(_) => return self.next.assemble(kind, request),
        };
        let Some(tokens) = self.first_configured(kind, keys)? else {
            return Ok(None);
        };

        let object = self.next.assemble(kind, Request::Tokens(&tokens))?;
        if let Some(Object::Component(component)) = &object {
            if let Some(resolver) = component.resolver() {
                tracing::debug!(
                    implementation = %component.implementation().type_name,
                    "Replacing active resolver"
                );
                self.ctx.resolver().replace(resolver);
            }
        }
        Ok(object)
    }

    fn close(&self) -> Result<()> {
        self.next.close()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{FixedResolver, Recorder, stage_context, strings};
    use super::*;
    use crate::plugin::Capability;
    use crate::registry::Registry;
    use pretty_assertions::assert_eq;

    const CAR: Capability = Capability::new("Car");

    fn stage(resolver: FixedResolver) -> (ConfigStage, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let stage = ConfigStage::new(
            stage_context(Registry::new(), resolver),
            Some(recorder.clone() as Arc<dyn Assembler>),
        );
        (stage, recorder)
    }

    #[test]
    fn test_default_key_from_kind_name() {
        let (stage, recorder) = stage(FixedResolver::default().with("Car", &["racing"]));
        stage
            .assemble(&Kind::array(CAR.into()), Request::Keys(&[]))
            .unwrap();
        assert_eq!(
            *recorder.seen.lock(),
            vec![("Car[]".to_string(), strings(&["racing"]))]
        );
    }

    #[test]
    fn test_first_configured_key_wins() {
        let (stage, recorder) = stage(
            FixedResolver::default()
                .with("prefix", &["shared"])
                .with("system.prefix", &["own"]),
        );
        let keys = strings(&["  ", "system.prefix", "prefix"]);
        stage.assemble(&Kind::String, Request::Keys(&keys)).unwrap();
        assert_eq!(recorder.seen.lock()[0].1, strings(&["own"]));
    }

    #[test]
    fn test_unconfigured_yields_nothing() {
        let (stage, recorder) = stage(FixedResolver::default());
        let keys = strings(&["wheel"]);
        let out = stage.assemble(&Kind::Capability(CAR), Request::Keys(&keys)).unwrap();
        assert!(out.is_none());
        assert!(recorder.seen.lock().is_empty());
    }

    #[test]
    fn test_tokens_pass_through() {
        let (stage, recorder) = stage(FixedResolver::default());
        let tokens = strings(&["a", "b"]);
        stage.assemble(&Kind::String, Request::Tokens(&tokens)).unwrap();
        assert_eq!(recorder.seen.lock()[0].1, tokens);
    }

    #[test]
    fn test_empty_tokens_fall_back_to_default_key() {
        let (stage, recorder) = stage(FixedResolver::default().with("Car", &["racing"]));
        stage
            .assemble(&Kind::Capability(CAR), Request::Tokens(&[]))
            .unwrap();
        assert_eq!(
            *recorder.seen.lock(),
            vec![("Car".to_string(), strings(&["racing"]))]
        );
    }
}
