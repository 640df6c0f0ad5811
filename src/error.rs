//! Error taxonomy shared by every hybrid operation

use crate::settings::Role;
use std::path::PathBuf;
use thiserror::Error;

/// Failure category, for callers that branch on the kind of error rather than
/// its details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingConfiguration,
    FileMissing,
    ParseFailure,
    PaddingInvalid,
    UnwrapFailure,
    MalformedInput,
    KeyGeneration,
    Encoding,
    Io,
}

/// Hybrid encryption errors.
///
/// Messages carry the offending role or path and never include key bytes.
#[derive(Error, Debug)]
pub enum HybridError {
    #[error("Missing configuration entry: {role}")]
    MissingConfiguration { role: Role },
    #[error("File not found: {}", path.display())]
    FileMissing { path: PathBuf },
    #[error("Cannot parse {}: {reason}", path.display())]
    ParseFailure { path: PathBuf, reason: String },
    #[error("Invalid padding (wrong key or corrupted ciphertext)")]
    PaddingInvalid,
    #[error("Failed to unwrap symmetric key (wrong private key or corrupted key file)")]
    UnwrapFailure,
    #[error("Malformed ciphertext: {len} bytes, expected at least {min}")]
    MalformedInput { len: usize, min: usize },
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
    #[error("Failed to encode {kind}: {reason}")]
    Encoding { kind: &'static str, reason: String },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HybridError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfiguration { .. } => ErrorKind::MissingConfiguration,
            Self::FileMissing { .. } => ErrorKind::FileMissing,
            Self::ParseFailure { .. } => ErrorKind::ParseFailure,
            Self::PaddingInvalid => ErrorKind::PaddingInvalid,
            Self::UnwrapFailure => ErrorKind::UnwrapFailure,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::KeyGeneration(_) => ErrorKind::KeyGeneration,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ParseFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
