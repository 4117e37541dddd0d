//! Applicability filters for plugin hooks.
//!
//! Hooks only see paths their filter matches. The empty pattern matches
//! everything and is the default.

use crate::error::{Error, Result};
use regex_lite::Regex;
use std::fmt;

/// A compiled path filter.
///
/// `None` is the match-all filter; no regex is compiled for it.
#[derive(Clone, Default)]
pub struct Filter {
    regex: Option<Regex>,
}

impl Filter {
    /// Compile a filter pattern.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFilter`] if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self::match_all());
        }
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex: Some(regex) })
    }

    /// A filter that matches every path.
    #[must_use]
    pub fn match_all() -> Self {
        Self { regex: None }
    }

    /// Whether the filter applies to `path`.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(path),
            None => true,
        }
    }

    /// The source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or("", Regex::as_str)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.as_str()).finish()
    }
}
