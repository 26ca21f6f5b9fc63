use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::parser::{ParseError, Token};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed config file {}: unterminated {token} starting at byte {offset}", .path.display())]
    Malformed {
        path: PathBuf,
        token: Token,
        offset: u64,
    },

    #[error("Not found: [{section}] {key}")]
    NotFound { section: String, key: String },

    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),
}

/// Coarse classification of a [`ConfigError`], for callers that only care
/// which of the three failure classes occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Malformed,
    Io,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Io { .. } => ErrorKind::Io,
            ConfigError::Malformed { .. } => ErrorKind::Malformed,
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::Parse(ParseError::Unterminated { .. }) => ErrorKind::Malformed,
            ConfigError::Parse(ParseError::Io { .. }) => ErrorKind::Io,
        }
    }

    /// Attaches the source path to a parser failure.
    pub(crate) fn with_path(err: ParseError, path: PathBuf) -> Self {
        match err {
            ParseError::Unterminated { token, offset } => ConfigError::Malformed {
                path,
                token,
                offset,
            },
            ParseError::Io { source, .. } => ConfigError::Io { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
