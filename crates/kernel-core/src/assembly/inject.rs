use super::{Assembler, Downstream, Request, StageContext};
use crate::plugin::{Capability, Component, Kind, Object};
use crate::{Error, Result};
use parking_lot::{Mutex, ReentrantMutex};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
enum Singleton {
    Ready(Component),
    /// Construction was vetoed or failed; never retried.
    Failed,
}

/// Singleton cache, property injection and lifecycle check for single-token
/// capability requests.
///
/// The raw instance is cached before its properties are injected, so a
/// dependency cycle resolves to the instance under construction. Builds are
/// serialized by a re-entrant lock: recursive builds on the building thread
/// proceed, other threads wait and then hit the cache.
pub struct InjectStage {
    ctx: Arc<StageContext>,
    next: Downstream,
    build_lock: ReentrantMutex<()>,
    cache: Mutex<HashMap<(Capability, String), Singleton>>,
}

impl InjectStage {
    pub fn new(ctx: Arc<StageContext>, next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            ctx,
            next: Downstream::new(next),
            build_lock: ReentrantMutex::new(()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn inject(&self, capability: &Capability, token: &str, component: &Component) -> Result<()> {
        let Some(configurable) = component.plugin().as_configurable() else {
            return Ok(());
        };
        let Some(root) = self.ctx.root() else {
            return Ok(());
        };

        let implementation = &component.implementation().type_name;
        for property in configurable.properties() {
            if matches!(&property.kind, Kind::Capability(c) if c == capability) {
                continue;
            }
            let keys = [format!("{token}.{}", property.name), property.name.clone()];
            let wrap = |source: Error| Error::Injection {
                implementation: implementation.clone(),
                property: property.name.clone(),
                source: Box::new(source),
            };

            match root.assemble(&property.kind, Request::Keys(&keys)).map_err(wrap)? {
                Some(value) => {
                    tracing::debug!(
                        implementation = %implementation,
                        property = %property.name,
                        "Injecting property"
                    );
                    configurable.set(&property.name, value).map_err(wrap)?;
                }
                None => {
                    tracing::trace!(
                        implementation = %implementation,
                        property = %property.name,
                        "Property not configured"
                    );
                }
            }
        }
        Ok(())
    }

    fn build(
        &self,
        kind: &Kind,
        request: Request<'_>,
        capability: &Capability,
        token: &str,
        key: (Capability, String),
    ) -> Result<Option<Object>> {
        let Some(object) = self.next.assemble(kind, request)? else {
            return Ok(None);
        };
        let Object::Component(component) = object else {
            return Ok(Some(object));
        };

        self.cache
            .lock()
            .insert(key.clone(), Singleton::Ready(component.clone()));

        if let Err(e) = self.inject(capability, token, &component) {
            self.cache.lock().remove(&key);
            return Err(e);
        }

        let accepted = match component.plugin().as_lifecycle() {
            Some(lifecycle) => lifecycle.init(),
            None => Ok(true),
        };
        match accepted {
            Ok(true) => Ok(Some(Object::Component(component))),
            Ok(false) => {
                tracing::debug!(
                    capability = %capability,
                    token,
                    "Lifecycle check declined instance"
                );
                self.cache.lock().insert(key, Singleton::Failed);
                Ok(None)
            }
            Err(e) => {
                self.cache.lock().insert(key, Singleton::Failed);
                Err(Error::Construction {
                    capability: capability.to_string(),
                    token: token.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }
}

impl Assembler for InjectStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let (Kind::Capability(capability), Some(token)) = (kind, request.single_token()) else {
            return self.next.assemble(kind, request);
        };
        let key = (capability.clone(), token.to_lowercase());

        let _build = self.build_lock.lock();
        let cached = self.cache.lock().get(&key).cloned();
        match cached {
            Some(Singleton::Ready(component)) => Ok(Some(Object::Component(component))),
            Some(Singleton::Failed) => Ok(None),
            None => self.build(kind, request, capability, token, key),
        }
    }

    fn close(&self) -> Result<()> {
        self.cache.lock().clear();
        self.next.close()
    }
}
