//! Positional insertion operators

use super::operator::{Anchors, index};
use super::{Resolver, is_simple_key};
use crate::Result;
use crate::chain::Successor;

/// Insert values after their anchor, or at the end when unanchored.
pub(crate) fn append(values: Vec<String>, mut anchors: Anchors) -> Vec<String> {
    if anchors.is_empty() {
        return values;
    }
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let inserted = anchors.remove(&value);
        out.push(value);
        out.extend(inserted.into_iter().flatten());
    }
    out.extend(anchors.into_values().flatten());
    out
}

/// Insert values before their anchor, or at the front when unanchored.
pub(crate) fn prepend(values: Vec<String>, mut anchors: Anchors) -> Vec<String> {
    if anchors.is_empty() {
        return values;
    }
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        if let Some(inserted) = anchors.remove(&value) {
            out.extend(inserted);
        }
        out.push(value);
    }
    let mut leftovers: Vec<String> = anchors.into_values().flatten().collect();
    leftovers.append(&mut out);
    leftovers
}

/// `key+=v` appends, `key+=anchor:v` inserts after `anchor`.
#[derive(Debug, Default)]
pub struct AppendResolver {
    next: Successor<dyn Resolver>,
}

impl AppendResolver {
    pub const OPERATOR: char = '+';

    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for AppendResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let values = self.next.resolve(key)?;
        if !is_simple_key(key) {
            return Ok(values);
        }
        let anchors = index(&self.next, &format!("{key}{}", Self::OPERATOR))?;
        Ok(append(values, anchors))
    }
}

resolver_plugin!(AppendResolver);

/// `key^=v` prepends, `key^=anchor:v` inserts before `anchor`.
#[derive(Debug, Default)]
pub struct PrependResolver {
    next: Successor<dyn Resolver>,
}

impl PrependResolver {
    pub const OPERATOR: char = '^';

    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for PrependResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let values = self.next.resolve(key)?;
        if !is_simple_key(key) {
            return Ok(values);
        }
        let anchors = index(&self.next, &format!("{key}{}", Self::OPERATOR))?;
        Ok(prepend(values, anchors))
    }
}

resolver_plugin!(PrependResolver);
