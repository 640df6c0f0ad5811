//! Persistence of key material: raw symmetric/wrapped key bytes and PEM RSA keys
//!
//! Saves never replace an existing file. The private key is written as
//! unencrypted PKCS#1 PEM; protecting it at rest is left to file permissions.

use crate::{
    asymmetric::WrappedSymmetricKey,
    error::HybridError,
    file_io,
    symmetric::{SymmetricKey, KEY_SIZE},
    Result,
};
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding},
    RsaPrivateKey, RsaPublicKey,
};
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

/// Key material to persist, tagged by kind
#[derive(Debug, Clone, Copy)]
pub enum KeyMaterial<'a> {
    /// Raw 16-byte symmetric key
    Symmetric(&'a SymmetricKey),
    /// Raw OAEP ciphertext of a symmetric key
    Wrapped(&'a WrappedSymmetricKey),
    /// SubjectPublicKeyInfo PEM
    Public(&'a RsaPublicKey),
    /// PKCS#1 PEM, unencrypted
    Private(&'a RsaPrivateKey),
}

impl KeyMaterial<'_> {
    /// Human readable kind, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Symmetric(_) => "symmetric key",
            Self::Wrapped(_) => "wrapped symmetric key",
            Self::Public(_) => "public key",
            Self::Private(_) => "private key",
        }
    }

    /// Serialize to the on-disk representation
    fn encode(&self) -> Result<Zeroizing<Vec<u8>>> {
        let encoding_error = |reason: String| HybridError::Encoding {
            kind: self.kind(),
            reason,
        };

        let bytes = match self {
            Self::Symmetric(key) => key.as_bytes().to_vec(),
            Self::Wrapped(wrapped) => wrapped.as_bytes().to_vec(),
            Self::Public(key) => key
                .to_public_key_pem(LineEnding::LF)
                .map_err(|e| encoding_error(e.to_string()))?
                .into_bytes(),
            Self::Private(key) => key
                .to_pkcs1_pem(LineEnding::LF)
                .map_err(|e| encoding_error(e.to_string()))?
                .as_bytes()
                .to_vec(),
        };

        Ok(Zeroizing::new(bytes))
    }
}

/// Result of a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was created with the given material
    Written,
    /// A file already existed at the path and was left untouched
    AlreadyExists,
}

/// Persist key material at `path`, creating parent directories.
///
/// If `path` already exists nothing is written and `AlreadyExists` is
/// returned; keys are never rotated by a save.
pub fn save<P: AsRef<Path>>(material: KeyMaterial<'_>, path: P) -> Result<SaveOutcome> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(SaveOutcome::AlreadyExists);
    }

    let bytes = material.encode()?;
    if file_io::write_new(path, &bytes)? {
        debug!(kind = material.kind(), path = %path.display(), "Saved key material");
        Ok(SaveOutcome::Written)
    } else {
        Ok(SaveOutcome::AlreadyExists)
    }
}

/// Read raw bytes from a key file
pub fn load_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    file_io::read_existing(path.as_ref())
}

/// Load a raw 16-byte symmetric key
pub fn load_symmetric_key<P: AsRef<Path>>(path: P) -> Result<SymmetricKey> {
    let path = path.as_ref();
    let bytes = Zeroizing::new(load_bytes(path)?);
    SymmetricKey::from_slice(&bytes).ok_or_else(|| {
        HybridError::parse(
            path,
            format!("expected {} key bytes, found {}", KEY_SIZE, bytes.len()),
        )
    })
}

/// Load a wrapped symmetric key
pub fn load_wrapped_key<P: AsRef<Path>>(path: P) -> Result<WrappedSymmetricKey> {
    let path = path.as_ref();
    let bytes = load_bytes(path)?;
    if bytes.is_empty() {
        return Err(HybridError::parse(path, "wrapped key file is empty"));
    }
    Ok(WrappedSymmetricKey::from_bytes(bytes))
}

fn load_pem(path: &Path) -> Result<Zeroizing<String>> {
    let bytes = load_bytes(path)?;
    String::from_utf8(bytes)
        .map(Zeroizing::new)
        .map_err(|_| HybridError::parse(path, "not a PEM document"))
}

/// Load a PEM public key (`PUBLIC KEY` or `RSA PUBLIC KEY`)
pub fn load_public_key<P: AsRef<Path>>(path: P) -> Result<RsaPublicKey> {
    let path = path.as_ref();
    let pem = load_pem(path)?;

    RsaPublicKey::from_public_key_pem(&pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(&pem))
        .map_err(|e| HybridError::parse(path, e))
}

/// Load an unencrypted PEM private key (`RSA PRIVATE KEY` or `PRIVATE KEY`)
pub fn load_private_key<P: AsRef<Path>>(path: P) -> Result<RsaPrivateKey> {
    let path = path.as_ref();
    let pem = load_pem(path)?;

    RsaPrivateKey::from_pkcs1_pem(&pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(&pem))
        .map_err(|e| HybridError::parse(path, e))
}
