//! Requested value kinds

use std::borrow::Cow;
use std::fmt;

/// A named pluggable contract, such as `Car` or `Resolver`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Capability {
    name: Cow<'static, str>,
}

impl Capability {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    /// A capability whose name is only known at runtime.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What the assembly chain is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Uri,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Capability(Capability),
    Array(Box<Kind>),
}

impl Kind {
    pub fn array(element: Kind) -> Self {
        Kind::Array(Box::new(element))
    }

    /// Name used as the default configuration key; arrays use their element.
    pub fn simple_name(&self) -> Cow<'_, str> {
        match self {
            Kind::Capability(capability) => Cow::Borrowed(capability.name()),
            Kind::Array(element) => element.simple_name(),
            other => Cow::Borrowed(other.scalar_name()),
        }
    }

    /// The capability of a capability kind or of an array of one.
    pub fn target_capability(&self) -> Option<&Capability> {
        match self {
            Kind::Capability(capability) => Some(capability),
            Kind::Array(element) => match element.as_ref() {
                Kind::Capability(capability) => Some(capability),
                _ => None,
            },
            _ => None,
        }
    }

    fn scalar_name(&self) -> &'static str {
        match self {
            Kind::String => "String",
            Kind::Uri => "Uri",
            Kind::Bool => "bool",
            Kind::Byte => "byte",
            Kind::Short => "short",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Char => "char",
            Kind::Capability(_) | Kind::Array(_) => "",
        }
    }
}

impl From<Capability> for Kind {
    fn from(capability: Capability) -> Self {
        Kind::Capability(capability)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Capability(capability) => write!(f, "{capability}"),
            Kind::Array(element) => write!(f, "{element}[]"),
            other => f.write_str(other.scalar_name()),
        }
    }
}
