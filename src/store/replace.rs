use regex::{NoExpand, Regex};
use std::borrow::Cow;

use crate::error::{StoreError, StoreResult};

/// Compiled pattern applied independently to each line of a file.
///
/// The pattern uses `regex` syntax and matches anywhere in a line, so `sample`
/// also matches inside `samples`. Replacement text is inserted literally.
#[derive(Debug, Clone)]
pub struct LinePattern {
    regex: Regex,
}

impl LinePattern {
    /// Compile `pattern`, reporting syntax errors as
    /// [`StoreError::InvalidPattern`]
    pub fn new(pattern: &str) -> StoreResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| match e {
            regex::Error::Syntax(message) => StoreError::invalid_pattern(pattern, message),
            other => StoreError::invalid_pattern(pattern, other.to_string()),
        })?;

        Ok(Self { regex })
    }

    /// Pattern matching `text` literally
    pub fn literal(text: &str) -> StoreResult<Self> {
        Self::new(&regex::escape(text))
    }

    /// Source text of the compiled pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Replace all non-overlapping matches in `line`, left to right.
    ///
    /// Returns the resulting line and the number of matches replaced. The line
    /// is borrowed unchanged when nothing matched.
    pub fn replace_line<'a>(&self, line: &'a str, replacement: &str) -> (Cow<'a, str>, usize) {
        let matches = self.regex.find_iter(line).count();
        if matches == 0 {
            return (Cow::Borrowed(line), 0);
        }

        (self.regex.replace_all(line, NoExpand(replacement)), matches)
    }
}

/// Summary of a `replace_word` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Lines in the file, unchanged by the pass
    pub lines: usize,
    /// Lines containing at least one match
    pub lines_changed: usize,
    /// Total matches replaced
    pub replacements: usize,
}

impl ReplaceOutcome {
    /// True when nothing matched and the file was left as it was
    pub fn is_unchanged(&self) -> bool {
        self.replacements == 0
    }
}
