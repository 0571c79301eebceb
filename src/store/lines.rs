use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{map_io_err, StoreResult};

/// Lazy line sequence over a text file.
///
/// Owns the buffered reader for as long as lines remain. The handle is
/// released as soon as the end of the file is reached, a read fails, or the
/// iterator is dropped. A line ends at `\n`, `\r\n` or a lone `\r`, and
/// each item is the line without its terminator.
#[derive(Debug)]
pub struct Lines {
    reader: Option<BufReader<File>>,
    path: PathBuf,
    /// Previous line ended in `\r`; a `\n` right after it belongs to that
    /// terminator
    skip_lf: bool,
    line_count: usize,
}

impl Lines {
    /// Open `path` for reading. Fails before yielding anything if the file
    /// cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        debug!("Opening file for reading: {}", path.display());

        let file = File::open(path).map_err(map_io_err(path))?;

        Ok(Self {
            reader: Some(BufReader::new(file)),
            path: path.to_path_buf(),
            skip_lf: false,
            line_count: 0,
        })
    }

    /// Number of lines produced so far
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(
                "Closed {} after {} lines",
                self.path.display(),
                self.line_count
            );
        }
    }
}

impl Iterator for Lines {
    type Item = StoreResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        let mut bytes = Vec::new();
        let line = match read_line_bytes(reader, &mut self.skip_lf, &mut bytes) {
            Ok(false) => {
                self.close();
                return None;
            }
            Ok(true) => String::from_utf8(bytes)
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, e)),
            Err(e) => Err(e),
        };

        match line {
            Ok(line) => {
                self.line_count += 1;
                Some(Ok(line))
            }
            Err(e) => {
                let err = map_io_err(&self.path)(e);
                self.close();
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Lines {}

/// Read one line into `line`, without its terminator.
///
/// Returns `false` once the input is exhausted and nothing was read. A `\r`
/// may be the last byte of a buffer, so the `\n` of a `\r\n` pair is only
/// dropped on the next call, through `skip_lf`.
fn read_line_bytes<R: BufRead>(
    reader: &mut R,
    skip_lf: &mut bool,
    line: &mut Vec<u8>,
) -> io::Result<bool> {
    if *skip_lf {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(false);
        }
        if available[0] == b'\n' {
            reader.consume(1);
        }
        *skip_lf = false;
    }

    let mut read_any = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                let terminator = available[end];
                line.extend_from_slice(&available[..end]);
                reader.consume(end + 1);
                *skip_lf = terminator == b'\r';
                return Ok(true);
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_yields_lines_without_terminators() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, "unix\nwindows\r\nlast").unwrap();

        let lines: Vec<String> = Lines::open(&path)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["unix", "windows", "last"]);
    }

    #[test]
    fn test_lone_carriage_return_ends_a_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("classic_mac.txt");
        fs::write(&path, "one\rsample\rthree").unwrap();

        let mut lines = Lines::open(&path).unwrap();
        let collected: Vec<String> = lines.by_ref().collect::<StoreResult<_>>().unwrap();
        assert_eq!(collected, vec!["one", "sample", "three"]);
        assert_eq!(lines.line_count(), 3);
    }

    #[test]
    fn test_consecutive_carriage_returns_give_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank_cr.txt");
        fs::write(&path, "a\r\r\r\nb\r").unwrap();

        let lines: Vec<String> = Lines::open(&path)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a", "", "", "b"]);
    }

    fn split_with_capacity(input: &[u8], capacity: usize) -> Vec<Vec<u8>> {
        let mut reader = BufReader::with_capacity(capacity, Cursor::new(input));
        let mut skip_lf = false;
        let mut lines = Vec::new();
        loop {
            let mut line = Vec::new();
            if !read_line_bytes(&mut reader, &mut skip_lf, &mut line).unwrap() {
                return lines;
            }
            lines.push(line);
        }
    }

    #[test]
    fn test_crlf_split_across_buffers_is_one_terminator() {
        let input = b"ab\r\ncd\r\n\r\nef\rg";
        let expected: Vec<Vec<u8>> = vec![
            b"ab".to_vec(),
            b"cd".to_vec(),
            b"".to_vec(),
            b"ef".to_vec(),
            b"g".to_vec(),
        ];

        for capacity in 1..=input.len() {
            assert_eq!(split_with_capacity(input, capacity), expected, "capacity {capacity}");
        }
    }

    #[test]
    fn test_trailing_newline_adds_no_empty_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trailing.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        let lines: Vec<String> = Lines::open(&path)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "\n\nthird\n").unwrap();

        let lines: Vec<String> = Lines::open(&path)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["", "", "third"]);
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let mut lines = Lines::open(&path).unwrap();
        assert!(lines.next().is_none());
        assert!(lines.next().is_none());
        assert_eq!(lines.line_count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_yielded_as_error_then_ends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, b"ok\n\xff\xfe\nafter\n").unwrap();

        let mut lines = Lines::open(&path).unwrap();
        assert_eq!(lines.next().unwrap().unwrap(), "ok");

        let err = lines.next().unwrap().unwrap_err();
        assert_eq!(err.io_kind(), Some(ErrorKind::InvalidData));
        assert_eq!(err.path(), Some(path.as_path()));

        assert!(lines.next().is_none());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = Lines::open(dir.path().join("missing.txt")).unwrap_err();
        assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
    }
}
