//! First/last line extraction
//!
//! A line ends at `\n`, with an optional preceding `\r` stripped. Trailing
//! terminators are never part of the returned line, and a blank final line
//! (content ending in `"\n\n"`) is a valid last line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::GetError;

/// First line of `content`, or `""` if empty
pub fn first_line(content: &str) -> &str {
    content.lines().next().unwrap_or("")
}

/// Last line of `content`, or `""` if empty
pub fn last_line(content: &str) -> &str {
    content.lines().last().unwrap_or("")
}

fn strip_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Read up to the first line break and no further
pub fn read_first_line<R: BufRead>(mut reader: R) -> std::io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    strip_terminator(&mut line);
    Ok(line)
}

/// Scan to the end of `reader`, keeping only the most recent line.
///
/// Only the kept line has to be valid UTF-8.
pub fn read_last_line<R: BufRead>(mut reader: R) -> std::io::Result<String> {
    let mut last = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        std::mem::swap(&mut last, &mut line);
    }

    let mut last = String::from_utf8(last)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    strip_terminator(&mut last);
    Ok(last)
}

/// First line of the file at `path`
pub fn first_line_of(path: &Path) -> Result<String, GetError> {
    let file = File::open(path).map_err(|e| GetError::file(path, e))?;
    read_first_line(BufReader::new(file)).map_err(|e| line_error(path, e))
}

/// Last line of the file at `path`
pub fn last_line_of(path: &Path) -> Result<String, GetError> {
    let file = File::open(path).map_err(|e| GetError::file(path, e))?;
    read_last_line(BufReader::new(file)).map_err(|e| line_error(path, e))
}

fn line_error(path: &Path, e: std::io::Error) -> GetError {
    if e.kind() == std::io::ErrorKind::InvalidData {
        GetError::invalid_utf8(path.display().to_string())
    } else {
        GetError::file(path, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const THREE_LINES: &str = "first line\nsecond line\nlast line\n";

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("first line\nsecond line\n"), "first line");
        assert_eq!(first_line("only"), "only");
        assert_eq!(first_line("crlf\r\nnext"), "crlf");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("\nsecond"), "");
    }

    #[test]
    fn test_last_line() {
        assert_eq!(last_line(THREE_LINES), "last line");
        assert_eq!(last_line("first line\nsecond line\nlast line"), "last line");
        assert_eq!(last_line("first line\nlast line\n\n"), "");
        assert_eq!(last_line("a\r\nb\r\n"), "b");
        assert_eq!(last_line(""), "");
    }

    #[test]
    fn test_readers_agree_with_str_versions() {
        let cases = [
            THREE_LINES,
            "no newline",
            "trailing blank\n\n",
            "",
            "\n",
            "a\r\nb\r\n",
        ];

        for case in cases {
            assert_eq!(
                read_first_line(Cursor::new(case)).unwrap(),
                first_line(case),
                "{:?}",
                case
            );
            assert_eq!(
                read_last_line(Cursor::new(case)).unwrap(),
                last_line(case),
                "{:?}",
                case
            );
        }
    }

    #[test]
    fn test_first_line_stops_at_break() {
        let mut reader = Cursor::new("one\ntwo\n");
        assert_eq!(read_first_line(&mut reader).unwrap(), "one");
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_line_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", THREE_LINES).unwrap();

        assert_eq!(first_line_of(file.path()).unwrap(), "first line");
        assert_eq!(last_line_of(file.path()).unwrap(), "last line");
    }

    #[test]
    fn test_blank_last_line_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first line\nlast line\n\n").unwrap();

        assert_eq!(last_line_of(file.path()).unwrap(), "");
    }

    #[test]
    fn test_last_line_skips_earlier_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xFF\xFE binary\nlast line\n").unwrap();

        assert_eq!(last_line_of(file.path()).unwrap(), "last line");
        assert!(matches!(
            first_line_of(file.path()),
            Err(GetError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn test_last_line_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first line\n\xFF\xFE\n").unwrap();

        assert!(matches!(
            last_line_of(file.path()),
            Err(GetError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn test_line_of_missing_file() {
        let result = first_line_of(Path::new("/definitely/not/a/real/path/12345"));
        assert!(result.unwrap_err().is_not_found());
    }
}
