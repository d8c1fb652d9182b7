//! Kernels over controlled resources.
//!
//! Every builder here uses an empty environment source so the host's
//! environment variables never leak into a test.

use crate::plugins;
use kernel_core::{Kernel, KernelBuilder};
use kernel_resource::{DirectorySearchPath, InlineResources, OverrideProperties};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Builder with every fixture implementation registered, reading the given
/// `kernel.properties` content from memory.
pub fn inline_builder(properties: &str) -> KernelBuilder {
    inline_builder_with(InlineResources::new().with("kernel.properties", properties.to_string()))
}

/// Builder with every fixture implementation registered over arbitrary
/// in-memory resources.
pub fn inline_builder_with(resources: InlineResources) -> KernelBuilder {
    plugins::implementations().into_iter().fold(
        Kernel::builder()
            .resources(Arc::new(resources))
            .environment(Arc::new(OverrideProperties::new())),
        KernelBuilder::register,
    )
}

/// Bootstrapped kernel over the given `kernel.properties` content.
///
/// # Panics
/// Panics if bootstrapping fails.
pub fn inline_kernel(properties: &str) -> Kernel {
    inline_builder(properties)
        .build()
        .expect("inline_kernel: bootstrap failed")
}

/// A temporary directory used as the kernel's resource search path.
///
/// # Example
///
/// ```rust,no_run
/// use kernel_test_utils::kernel::ConfigDir;
///
/// let dir = ConfigDir::new();
/// dir.write("kernel.properties", "car=racing\n");
/// let kernel = dir.builder().build().unwrap();
/// ```
pub struct ConfigDir {
    temp_dir: TempDir,
}

impl Default for ConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` (relative to the root), creating parents.
    pub fn write(&self, name: &str, content: &str) -> &Self {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn search_path(&self) -> DirectorySearchPath {
        DirectorySearchPath::new([self.root()])
    }

    /// Builder with every fixture implementation registered, reading
    /// resources from this directory.
    pub fn builder(&self) -> KernelBuilder {
        plugins::implementations().into_iter().fold(
            Kernel::builder()
                .resources(Arc::new(self.search_path()))
                .environment(Arc::new(OverrideProperties::new())),
            KernelBuilder::register,
        )
    }
}
