use super::{Assembler, Downstream, Request};
use crate::plugin::{Component, Kind, Object};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tracks every instance with a teardown contract, most recent first, and
/// closes them all when the chain is closed.
pub struct TeardownStage {
    next: Downstream,
    tracked: Mutex<Vec<Component>>,
}

impl TeardownStage {
    pub fn new(next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            next: Downstream::new(next),
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// Number of instances awaiting teardown.
    pub fn tracked(&self) -> usize {
        self.tracked.lock().len()
    }

    fn track(&self, component: &Component) {
        if component.plugin().as_teardown().is_none() {
            return;
        }
        let mut tracked = self.tracked.lock();
        if !tracked.iter().any(|known| known.ptr_eq(component)) {
            tracked.insert(0, component.clone());
        }
    }
}

impl Assembler for TeardownStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let object = self.next.assemble(kind, request)?;
        match &object {
            Some(Object::Component(component)) => self.track(component),
            Some(Object::Array(items)) => items
                .iter()
                .filter_map(Object::as_component)
                .for_each(|component| self.track(component)),
            _ => {}
        }
        Ok(object)
    }

    fn close(&self) -> Result<()> {
        let tracked = std::mem::take(&mut *self.tracked.lock());
        let mut failures = Vec::new();
        for component in &tracked {
            let Some(teardown) = component.plugin().as_teardown() else {
                continue;
            };
            if let Err(e) = teardown.close() {
                let implementation = &component.implementation().type_name;
                tracing::warn!(implementation = %implementation, error = %e, "Teardown failed");
                failures.push(format!("{implementation}: {e}"));
            }
        }
        if let Err(e) = self.next.close() {
            failures.push(e.to_string());
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Teardown { failures })
        }
    }
}
