//! Resource access for the plugin kernel
//!
//! Provides resource search paths, line-oriented resource reading, key-value
//! resource parsing and the property sources consulted by terminal resolver
//! stages.

pub mod error;
pub mod properties;
pub mod resource;
pub mod search;
pub mod source;

pub use error::{Error, Result};
pub use properties::Properties;
pub use resource::{COMMENT, Resource, content_lines, strip_comment};
pub use search::{
    DirectorySearchPath, InlineResources, LayeredSearchPath, ResourceSearchPath,
    validate_resource_name,
};
pub use source::{OverrideProperties, ProcessEnvironment, PropertySource};
