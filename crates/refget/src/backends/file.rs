//! File backend

use std::path::Path;

use crate::error::GetError;

/// Read the full content of a file
pub fn read(path: &Path) -> Result<Vec<u8>, GetError> {
    std::fs::read(path).map_err(|e| GetError::file(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "secret-content").unwrap();

        let result = read(file.path()).unwrap();
        assert_eq!(result, b"secret-content\n");
    }

    #[test]
    fn test_read_missing_file() {
        let result = read(Path::new("/definitely/not/a/real/path/12345"));
        assert!(matches!(result, Err(GetError::File { .. })));
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_empty_path() {
        assert!(read(Path::new("")).is_err());
    }
}
