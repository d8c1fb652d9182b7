//! Shared test fixtures for the plugin kernel workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`plugins`]: sample capabilities and implementations (cars, wheels,
//!   filters, closeable probes)
//! - [`kernel`]: kernels built over inline or temporary on-disk resources

pub mod kernel;
pub mod plugins;
