//! Reading source files: UTF-8 first, Latin-1 on decode failure.

use std::path::{Path, PathBuf};

/// Errors from reading a source file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a file as text.
///
/// Bytes that are not valid UTF-8 are decoded as Latin-1, which maps every
/// byte to a char and therefore never fails.
pub fn read_source(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::debug!(
                "failed to decode {} as UTF-8, retrying as Latin-1",
                path.display()
            );
            Ok(decode_latin1(err.as_bytes()))
        }
    }
}

/// Decode bytes as ISO-8859-1.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
