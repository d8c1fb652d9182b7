use super::{Assembler, Downstream, Request};
use crate::plugin::{Component, Kind, Object};
use crate::{Error, Result};
use std::sync::Arc;

/// Chain position of a component; lower runs earlier.
///
/// A declared order or a `Prioritized` priority is used as is (declaring
/// both is an error). Otherwise linkable components go first (0) and
/// everything else last.
pub fn order_of(component: &Component) -> Result<i32> {
    let declared = component.implementation().order;
    let priority = component
        .plugin()
        .as_prioritized()
        .map(|prioritized| prioritized.priority());
    match (declared, priority) {
        (Some(_), Some(_)) => Err(Error::ConflictingOrder {
            implementation: component.implementation().type_name.clone(),
        }),
        (Some(order), None) | (None, Some(order)) => Ok(order),
        (None, None) if component.plugin().as_linkable().is_some() => Ok(0),
        (None, None) => Ok(i32::MAX),
    }
}

/// Link components into one chain ordered by [`order_of`] and return its
/// head. Equal orders keep their given order.
pub fn compose(components: Vec<Component>) -> Result<Option<Component>> {
    let mut ordered = components
        .into_iter()
        .map(|component| Ok((order_of(&component)?, component)))
        .collect::<Result<Vec<_>>>()?;
    ordered.sort_by_key(|(order, _)| *order);

    let mut reversed = ordered.into_iter().rev();
    let Some((_, mut head)) = reversed.next() else {
        return Ok(None);
    };
    for (_, component) in reversed {
        let linkable = component
            .plugin()
            .as_linkable()
            .ok_or_else(|| Error::NotLinkable {
                implementation: component.implementation().type_name.clone(),
            })?;
        linkable.link(head)?;
        head = component;
    }
    tracing::debug!(
        capability = %head.implementation().capability,
        head = %head.implementation().type_name,
        "Composed chain"
    );
    Ok(Some(head))
}

/// Several tokens for one capability become one linked chain.
pub struct ChainStage {
    next: Downstream,
}

impl ChainStage {
    pub fn new(next: Option<Arc<dyn Assembler>>) -> Self {
        Self {
            next: Downstream::new(next),
        }
    }
}

impl Assembler for ChainStage {
    fn assemble(&self, kind: &Kind, request: Request<'_>) -> Result<Option<Object>> {
        let (Kind::Capability(_), Some(tokens)) = (kind, request.tokens()) else {
            return self.next.assemble(kind, request);
        };
        if tokens.len() <= 1 {
            return self.next.assemble(kind, request);
        }

        let Some(built) = self
            .next
            .assemble(&Kind::array(kind.clone()), Request::Tokens(tokens))?
        else {
            return Ok(None);
        };
        let Object::Array(items) = built else {
            return Ok(Some(built));
        };
        let components = items.into_iter().filter_map(Object::into_component).collect();
        Ok(compose(components)?.map(Object::Component))
    }

    fn close(&self) -> Result<()> {
        self.next.close()
    }
}
