//! Microkernel for configuration-driven plugin assembly
//!
//! The kernel answers two questions for its host:
//!
//! - **Value resolution**: what does configuration key `k` resolve to? A chain
//!   of resolver stages rewrites keys, applies operator edits (`k+`, `k^`,
//!   `k~`, `k-`), expands references and file includes, and finally reads
//!   overrides, the environment and ordered `kernel.properties` resources.
//! - **Object assembly**: how is an instance of kind `K` built? A chain of
//!   assembly stages turns resolved tokens into literals, arrays, linked
//!   chains and singleton plugin instances with injected properties.
//!
//! # Architecture
//!
//! ```text
//!                  Kernel
//!                    |
//!        +-----------+-----------+
//!        |                       |
//!    assembly  ---resolves--->  config
//!        |                       |
//!     registry               kernel-resource
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kernel_core::{Kernel, plugin::{Capability, Kind}};
//!
//! let kernel = Kernel::new()?;
//! let filters = kernel.resolve("filters")?;
//! let car = kernel.component(&Capability::new("Car"))?;
//! kernel.close()?;
//! ```

pub mod assembly;
pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod kernel;
pub mod logging;
pub mod plugin;
pub mod registry;

pub use context::Context;
pub use error::{Error, Result};
pub use kernel::{Kernel, KernelBuilder};
pub use plugin::{Capability, Component, Kind, Object, Plugin};
pub use registry::{Implementation, RESOLVER, Registry};
