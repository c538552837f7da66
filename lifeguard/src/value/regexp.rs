//! Regular-expression values written as `/pattern/flags` literals.

use regex::{Regex, RegexBuilder};
use std::fmt;
use thiserror::Error;

/// JavaScript regular-expression flags. `d`, `g`, `u`, `v` and `y` are
/// kept but do not change matching.
const KNOWN_FLAGS: &str = "dgimsuvy";

/// Errors building a [`RegExp`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegExpError {
    /// A flag outside the supported set.
    #[error("Unknown regular expression flag '{0}'")]
    UnknownFlag(char),

    /// A flag given more than once.
    #[error("Duplicate regular expression flag '{0}'")]
    DuplicateFlag(char),

    /// The pattern does not compile.
    #[error("Invalid regular expression: {0}")]
    InvalidPattern(String),
}

/// A compiled regular expression that remembers its source and flags.
#[derive(Clone)]
pub struct RegExp {
    source: String,
    flags: String,
    regex: Regex,
}

impl RegExp {
    /// Compiles `source` with the given flags.
    pub fn new(source: &str, flags: &str) -> Result<Self, RegExpError> {
        let mut builder = RegexBuilder::new(source);
        for (position, flag) in flags.char_indices() {
            if flags[..position].contains(flag) {
                return Err(RegExpError::DuplicateFlag(flag));
            }
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'd' | 'g' | 'u' | 'v' | 'y' => {}
                other => return Err(RegExpError::UnknownFlag(other)),
            }
        }

        let regex = builder
            .build()
            .map_err(|e| RegExpError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    /// Parses a `/pattern/flags` literal.
    ///
    /// Returns `None` when the text is not shaped like a literal, carries an
    /// unknown flag, or the pattern does not compile.
    #[must_use]
    pub fn parse_literal(text: &str) -> Option<Self> {
        let (source, flags) = text.strip_prefix('/')?.rsplit_once('/')?;

        if source.is_empty() || flags.chars().any(|c| !KNOWN_FLAGS.contains(c)) {
            return None;
        }
        Self::new(source, flags).ok()
    }

    /// The pattern as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flags as written.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// True if the pattern matches somewhere in `haystack`.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// The compiled expression.
    #[must_use]
    pub const fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for RegExp {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Debug for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegExp({self})")
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
