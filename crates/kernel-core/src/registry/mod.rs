//! Discovery registry
//!
//! Maps each capability to the implementations known for it. Used for
//! short-name lookup and wildcard expansion.

mod builtins;
mod store;
mod types;

pub use builtins::{BUILTIN_COUNT, RESOLVER, builtin_implementations};
pub use store::Registry;
pub use types::{Factory, Implementation};
