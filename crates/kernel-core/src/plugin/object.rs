//! Assembled values

use super::Plugin;
use crate::config::Resolver;
use crate::registry::Implementation;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// A constructed plugin instance together with the descriptor it was built
/// from. Clones share the instance.
#[derive(Clone)]
pub struct Component {
    implementation: Arc<Implementation>,
    plugin: Arc<dyn Plugin>,
}

impl Component {
    pub fn new(implementation: Arc<Implementation>, plugin: Arc<dyn Plugin>) -> Self {
        Self {
            implementation,
            plugin,
        }
    }

    pub fn implementation(&self) -> &Arc<Implementation> {
        &self.implementation
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    /// Identity comparison: true when both handles share one instance.
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Arc::ptr_eq(&self.plugin, &other.plugin)
    }

    pub fn downcast_ref<T: Plugin>(&self) -> Option<&T> {
        (*self.plugin).as_any().downcast_ref::<T>()
    }

    pub fn is<T: Plugin>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// The value-resolution capability of this instance, if it has one.
    pub fn resolver(&self) -> Option<Arc<dyn Resolver>> {
        Arc::clone(&self.plugin).into_resolver()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("capability", &self.implementation.capability.name())
            .field("type_name", &self.implementation.type_name)
            .finish_non_exhaustive()
    }
}

/// A value produced by the assembly chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    String(String),
    Uri(Url),
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Component(Component),
    Array(Vec<Object>),
}

impl Object {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&Url> {
        match self {
            Object::Uri(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Any integral value widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Object::Byte(value) => Some(i64::from(*value)),
            Object::Short(value) => Some(i64::from(*value)),
            Object::Int(value) => Some(i64::from(*value)),
            Object::Long(value) => Some(*value),
            _ => None,
        }
    }

    /// Any floating value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Object::Float(value) => Some(f64::from(*value)),
            Object::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Object::Char(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Object::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn into_component(self) -> Option<Component> {
        match self {
            Object::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<Object>> {
        match self {
            Object::Array(items) => Some(items),
            _ => None,
        }
    }

    /// String elements of an array of strings; other elements are skipped.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Object::String(value) => vec![value],
            Object::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Object::String(value) => Some(value),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Component> for Object {
    fn from(component: Component) -> Self {
        Object::Component(component)
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::String(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(value.to_string())
    }
}
