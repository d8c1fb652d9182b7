//! Resource handles and line-oriented reading

use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Comment marker for line-oriented resources.
pub const COMMENT: char = '#';

/// Where the bytes of a resource live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Origin {
    File(PathBuf),
    Inline(Arc<str>),
}

/// A located resource.
///
/// Handles are produced by a [`ResourceSearchPath`](crate::ResourceSearchPath)
/// and compare by location, so the same file found twice is the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    location: String,
    origin: Origin,
}

impl Resource {
    /// A resource backed by a file on disk.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: path.to_string_lossy().replace('\\', "/"),
            origin: Origin::File(path),
        }
    }

    /// A resource whose content is held in memory.
    pub fn inline(location: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            location: location.into(),
            origin: Origin::Inline(content.into()),
        }
    }

    /// Display identity of the resource (a path or a pseudo-URL).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Path on disk, if the resource is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::File(path) => Some(path),
            Origin::Inline(_) => None,
        }
    }

    /// Read the full text of the resource.
    pub fn read_to_string(&self) -> Result<String> {
        match &self.origin {
            Origin::File(path) => fs::read_to_string(path).map_err(|e| Error::io(path, e)),
            Origin::Inline(content) => Ok(content.to_string()),
        }
    }

    /// Read the raw lines of the resource.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        Ok(self
            .read_to_string()?
            .lines()
            .map(str::to_string)
            .collect())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}

/// Strip a trailing `#` comment and surrounding whitespace from a line.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

/// Reduce raw lines to their meaningful content: comments stripped,
/// whitespace trimmed, blank lines dropped.
pub fn content_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = strip_comment(line.as_ref());
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}
