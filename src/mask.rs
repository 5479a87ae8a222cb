//! Shell-style entry masks
//!
//! Masks follow the usual glob grammar (`*`, `?`, `[abc]`, `[a-z]`, `[!abc]`) and are matched
//! against whole entry names. A wildcard never crosses a `/`, so `docs/*` matches
//! `docs/a.txt` but not `docs/sub/a.txt`. Runs of stars act as a single `*`, and `\c`
//! matches the character `c` literally.

use crate::error::{Result, ZipperError};
use glob::{MatchOptions, Pattern, PatternError};
use std::fmt;
use std::str::FromStr;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled entry mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    source: String,
    pattern: Pattern,
}

impl Mask {
    /// Compile a mask, failing with [`ZipperError::InvalidPattern`] if it is malformed
    pub fn new(mask: &str) -> Result<Self> {
        let invalid = |source| ZipperError::InvalidPattern {
            pattern: mask.to_string(),
            source,
        };
        let pattern = Pattern::new(&translate(mask).map_err(invalid)?).map_err(invalid)?;
        Ok(Self {
            source: mask.to_string(),
            pattern,
        })
    }

    /// Check whether an entry name matches this mask
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches_with(name, MATCH_OPTIONS)
    }

    /// The mask as originally written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Rewrite a mask into the `glob` crate's dialect
///
/// Star runs collapse to one `*` so they never turn into the recursive `**`. Escaped
/// metacharacters become single-character classes; other escaped characters are emitted
/// as is.
fn translate(mask: &str) -> std::result::Result<String, PatternError> {
    let mut out = String::with_capacity(mask.len());
    let mut chars = mask.char_indices().peekable();
    let mut in_class = false;

    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next().ok_or(PatternError {
                    pos,
                    msg: "trailing backslash escapes nothing",
                })?;
                match escaped {
                    '*' | '?' | '[' if !in_class => {
                        out.push('[');
                        out.push(escaped);
                        out.push(']');
                    }
                    _ => out.push(escaped),
                }
            }
            '*' if !in_class => {
                out.push('*');
                while chars.next_if(|&(_, next)| next == '*').is_some() {}
            }
            '[' if !in_class => {
                in_class = true;
                out.push('[');
                // A leading `!` and then a leading `]` are part of the class body
                if let Some((_, bang)) = chars.next_if(|&(_, next)| next == '!') {
                    out.push(bang);
                }
                if let Some((_, bracket)) = chars.next_if(|&(_, next)| next == ']') {
                    out.push(bracket);
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

impl FromStr for Mask {
    type Err = ZipperError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
