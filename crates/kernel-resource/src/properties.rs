//! Key-value resource parsing
//!
//! The format is line oriented: `key=value`, `#` starts a comment, blank lines
//! are ignored, keys and values are trimmed. A key assigned twice keeps the
//! later value.

use crate::resource::strip_comment;
use crate::{Error, Resource, Result};

/// Parsed `key=value` pairs in first-assignment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse property text. `location` is only used in error messages.
    pub fn parse(location: &str, text: &str) -> Result<Self> {
        Self::parse_lines(location, text.lines())
    }

    /// Parse already-split lines.
    pub fn parse_lines<I, S>(location: &str, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties = Self::new();
        for (idx, raw) in lines.into_iter().enumerate() {
            let line = strip_comment(raw.as_ref());
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::Parse {
                    location: location.to_string(),
                    line: idx + 1,
                    message: format!("expected `key=value`, found {line:?}"),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::Parse {
                    location: location.to_string(),
                    line: idx + 1,
                    message: "empty key".to_string(),
                });
            }
            properties.set(key, value.trim());
        }
        Ok(properties)
    }

    /// Load and parse a resource.
    pub fn load(resource: &Resource) -> Result<Self> {
        let text = resource.read_to_string()?;
        Self::parse(resource.location(), &text)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Assign a value, replacing any earlier assignment of the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# header\n\nfilters = trace, aaa \nfilters+=trace:zzz # note\n";
        let props = Properties::parse("inline", text).unwrap();

        assert_eq!(props.len(), 2);
        assert_eq!(props.get("filters"), Some("trace, aaa"));
        assert_eq!(props.get("filters+"), Some("trace:zzz"));
    }

    #[test]
    fn test_later_assignment_wins_and_keeps_position() {
        let props = Properties::parse("inline", "a=1\nb=2\na=3").unwrap();
        assert_eq!(props.get("a"), Some("3"));
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_value_is_kept() {
        let props = Properties::parse("inline", "empty=").unwrap();
        assert_eq!(props.get("empty"), Some(""));
    }

    #[rstest]
    #[case("no separator here", 1)]
    #[case("a=1\n=value", 2)]
    fn test_malformed_lines_report_position(#[case] text: &str, #[case] line: usize) {
        match Properties::parse("test.properties", text) {
            Err(Error::Parse {
                location,
                line: actual,
                ..
            }) => {
                assert_eq!(location, "test.properties");
                assert_eq!(actual, line);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
