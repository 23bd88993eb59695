use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("blacklist file not found: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read blacklist {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PolicyError {
    pub(crate) fn missing(path: &Path) -> Self {
        Self::MissingFile {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
