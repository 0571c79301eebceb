pub mod lines;
pub mod replace;

pub use lines::Lines;
pub use replace::{LinePattern, ReplaceOutcome};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{map_io_err, StoreResult};

/// Separator written after every line when a file is rewritten line by line
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Whole-file text operations against a single path.
///
/// Every call does its own open, process and close cycle; nothing is cached
/// between calls and no locking is done.
#[derive(Debug, Clone)]
pub struct FileTextStore {
    path: PathBuf,
}

impl FileTextStore {
    /// Create a store for `path`. The file is not touched until an operation
    /// runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path every operation acts on
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or truncate the file and write `content` verbatim.
    ///
    /// No terminator is appended. The buffer is flushed explicitly so a
    /// failed flush is reported rather than lost on drop.
    pub fn write(&self, content: &str) -> StoreResult<()> {
        debug!(
            "Writing {} bytes to {}",
            content.len(),
            self.path.display()
        );

        let file = File::create(&self.path).map_err(map_io_err(&self.path))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .map_err(map_io_err(&self.path))?;
        writer.flush().map_err(map_io_err(&self.path))?;

        Ok(())
    }

    /// Lazily read the file line by line.
    ///
    /// Opening errors are returned here; read errors are yielded by the
    /// iterator.
    pub fn read_all(&self) -> StoreResult<Lines> {
        Lines::open(&self.path)
    }

    /// Read every line of the file, failing on the first error
    pub fn read_lines(&self) -> StoreResult<Vec<String>> {
        self.read_all()?.collect()
    }

    /// Replace every match of the regex `old` with the literal `new`, line by
    /// line, and rewrite the file.
    ///
    /// Each rewritten line is followed by [`LINE_SEPARATOR`]. The file is left
    /// untouched when nothing matches. The rewrite is not atomic.
    pub fn replace_word(&self, old: &str, new: &str) -> StoreResult<ReplaceOutcome> {
        let pattern = LinePattern::new(old)?;
        let lines = self.read_lines()?;

        let mut outcome = ReplaceOutcome {
            lines: lines.len(),
            ..ReplaceOutcome::default()
        };
        let mut rewritten = Vec::with_capacity(lines.len());
        for line in &lines {
            let (replaced, count) = pattern.replace_line(line, new);
            if count > 0 {
                outcome.lines_changed += 1;
                outcome.replacements += count;
            }
            rewritten.push(replaced);
        }

        if outcome.is_unchanged() {
            debug!(
                "No match for '{}' in {}, leaving file untouched",
                pattern.as_str(),
                self.path.display()
            );
            return Ok(outcome);
        }

        self.write_lines(&rewritten)?;
        debug!(
            "Replaced {} matches of '{}' across {} of {} lines in {}",
            outcome.replacements,
            pattern.as_str(),
            outcome.lines_changed,
            outcome.lines,
            self.path.display()
        );

        Ok(outcome)
    }

    fn write_lines<S: AsRef<str>>(&self, lines: &[S]) -> StoreResult<()> {
        let file = File::create(&self.path).map_err(map_io_err(&self.path))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writer
                .write_all(line.as_ref().as_bytes())
                .and_then(|_| writer.write_all(LINE_SEPARATOR.as_bytes()))
                .map_err(map_io_err(&self.path))?;
        }
        writer.flush().map_err(map_io_err(&self.path))?;

        Ok(())
    }
}
