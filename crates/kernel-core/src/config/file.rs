use super::Resolver;
use crate::chain::Successor;
use crate::{Error, Result};
use kernel_resource::{ResourceSearchPath, content_lines};
use std::fmt;
use std::sync::Arc;

/// Marks a token naming a resource to inline: `filters=@filters.txt`.
pub const FILE_SIGIL: char = '@';

/// Replaces `@name` tokens with the content lines of every resource named
/// `name` on the search path.
pub struct FileResolver {
    next: Successor<dyn Resolver>,
    resources: Arc<dyn ResourceSearchPath>,
}

impl FileResolver {
    pub fn new(resources: Arc<dyn ResourceSearchPath>) -> Self {
        Self {
            next: Successor::new(),
            resources,
        }
    }

    fn include(&self, name: &str) -> Result<Vec<String>> {
        let found = self.resources.find(name)?;
        if found.is_empty() {
            return Err(Error::MissingResource {
                name: name.to_string(),
            });
        }
        let mut lines = Vec::new();
        for resource in &found {
            tracing::debug!(name, location = resource.location(), "Including resource");
            lines.extend(content_lines(self.resources.open(resource)?));
        }
        Ok(lines)
    }
}

impl Resolver for FileResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for value in self.next.resolve(key)? {
            match value.strip_prefix(FILE_SIGIL) {
                Some(name) => out.extend(self.include(name.trim())?),
                None => out.push(value),
            }
        }
        Ok(out)
    }
}

impl fmt::Debug for FileResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileResolver")
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

resolver_plugin!(FileResolver);
