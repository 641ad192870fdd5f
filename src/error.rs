use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create directory {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to create staging file: {0}")]
    Staging(io::Error),

    #[error("staging path {0:?} already exists and would be overwritten")]
    StagingExists(PathBuf),

    #[error("failed to parse config {path:?}: {source}")]
    Config {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("an output path is required when translating tokens")]
    MissingOutPath,

    #[error("vocabulary {0:?} contains no tokens")]
    InvalidVocabulary(PathBuf),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Read { path, source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Write { path, source }
    }
}
