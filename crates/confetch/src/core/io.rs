//! Filesystem helpers shared by the init loader and file fetchers

use super::{ConfigError, ConfigResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read the whole file at `path`; the handle is closed before returning.
pub(crate) fn read_file(path: &Path) -> ConfigResult<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| ConfigError::file_open(path, &e))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ConfigError::file_read(path, &e))?;

    tracing::trace!(path = %path.display(), bytes = bytes.len(), "Read config file");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"a": 1}"#).unwrap();

        assert_eq!(read_file(file.path()).unwrap(), br#"{"a": 1}"#.to_vec());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileOpen { path: ref p, .. } if p == &path));
    }
}
