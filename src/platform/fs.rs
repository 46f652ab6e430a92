// LuckyDraw - platform/fs.rs
//
// File reading for participant imports.

use crate::util::error::ImportError;
use std::path::Path;

/// Read an import file (`.txt` / `.csv`) as text.
///
/// Files larger than `max_bytes` are rejected before reading. Invalid UTF-8
/// is replaced rather than rejected.
pub fn read_import_file(path: &Path, max_bytes: u64) -> Result<String, ImportError> {
    let io_err = |source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_bytes {
        return Err(ImportError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Import file read");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_import_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guests.txt");
        std::fs::write(&path, "Ann\nBo\n").unwrap();
        assert_eq!(read_import_file(&path, 1024).unwrap(), "Ann\nBo\n");
    }

    #[test]
    fn test_read_import_file_lossy_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"Jos\xe9\n").unwrap();
        let text = read_import_file(&path, 1024).unwrap();
        assert!(text.starts_with("Jos"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_import_file_too_large() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'a'; 2048]).unwrap();
        let err = read_import_file(&path, 1024).unwrap_err();
        assert!(matches!(err, ImportError::FileTooLarge { size: 2048, .. }));
    }

    #[test]
    fn test_read_import_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_import_file(&dir.path().join("nope.txt"), 1024).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
