//! Resolved file-system configuration for the three hybrid operations

use crate::{error::HybridError, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
};

/// Default settings file name, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Logical role a configured path plays in an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// PEM public key
    PublicKey,
    /// PEM private key
    SecretKey,
    /// Wrapped (RSA-encrypted) symmetric key
    SymmetricKey,
    /// Plaintext input of an encryption
    InitialFile,
    /// Ciphertext output of an encryption, input of a decryption
    EncryptedFile,
    /// Plaintext output of a decryption
    DecryptedFile,
}

impl Role {
    /// Name of the settings entry carrying this role
    pub fn key(&self) -> &'static str {
        match self {
            Self::PublicKey => "public_key",
            Self::SecretKey => "secret_key",
            Self::SymmetricKey => "symmetric_key",
            Self::InitialFile => "initial_file",
            Self::EncryptedFile => "encrypted_file",
            Self::DecryptedFile => "decrypted_file",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Paths consumed by the generate/encrypt/decrypt operations.
///
/// Every entry is optional on its own; each operation checks the subset it
/// needs before touching keys or files. Unknown entries in a settings file are
/// ignored so the same file can carry data for other tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetric_key: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decrypted_file: Option<PathBuf>,
}

impl Settings {
    /// Create empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => HybridError::FileMissing {
                path: path.to_path_buf(),
            },
            _ => HybridError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        Self::from_json(&contents).map_err(|e| HybridError::ParseFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Path configured for `role`, if any. Empty strings count as unset.
    pub fn get(&self, role: Role) -> Option<&Path> {
        let path = match role {
            Role::PublicKey => &self.public_key,
            Role::SecretKey => &self.secret_key,
            Role::SymmetricKey => &self.symmetric_key,
            Role::InitialFile => &self.initial_file,
            Role::EncryptedFile => &self.encrypted_file,
            Role::DecryptedFile => &self.decrypted_file,
        };
        path.as_deref().filter(|p| !p.as_os_str().is_empty())
    }

    /// Path configured for `role`, or `MissingConfiguration` naming it
    pub fn require(&self, role: Role) -> Result<&Path> {
        self.get(role)
            .ok_or(HybridError::MissingConfiguration { role })
    }

    /// Check that every role in `roles` is configured, reporting the first gap
    pub fn require_all(&self, roles: &[Role]) -> Result<()> {
        for &role in roles {
            self.require(role)?;
        }
        Ok(())
    }

    /// Set the public key path
    pub fn with_public_key<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.public_key = Some(path.into());
        self
    }

    /// Set the private key path
    pub fn with_secret_key<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.secret_key = Some(path.into());
        self
    }

    /// Set the wrapped symmetric key path
    pub fn with_symmetric_key<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.symmetric_key = Some(path.into());
        self
    }

    /// Set the plaintext input path
    pub fn with_initial_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.initial_file = Some(path.into());
        self
    }

    /// Set the ciphertext path
    pub fn with_encrypted_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.encrypted_file = Some(path.into());
        self
    }

    /// Set the decrypted output path
    pub fn with_decrypted_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.decrypted_file = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_settings() {
        let json = r#"{
            "public_key": "keys/public.pem",
            "secret_key": "keys/private.pem",
            "symmetric_key": "keys/symmetric.key",
            "initial_file": "data/input.txt",
            "encrypted_file": "data/encrypted.bin",
            "decrypted_file": "data/decrypted.txt"
        }"#;

        let settings = Settings::from_json(json).unwrap();
        assert_eq!(
            settings.get(Role::PublicKey),
            Some(Path::new("keys/public.pem"))
        );
        assert_eq!(
            settings.get(Role::DecryptedFile),
            Some(Path::new("data/decrypted.txt"))
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let json = r#"{"public_key": "pub.pem", "comment": "lab 3"}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.get(Role::PublicKey), Some(Path::new("pub.pem")));
        assert_eq!(settings.get(Role::SecretKey), None);
    }

    #[test]
    fn test_require_reports_role() {
        let settings = Settings::new().with_public_key("pub.pem");
        let err = settings.require(Role::SecretKey).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingConfiguration);
        assert!(err.to_string().contains("secret_key"));
    }

    #[test]
    fn test_empty_path_is_missing() {
        let settings = Settings::from_json(r#"{"secret_key": ""}"#).unwrap();
        assert!(matches!(
            settings.require(Role::SecretKey),
            Err(HybridError::MissingConfiguration {
                role: Role::SecretKey
            })
        ));
    }

    #[test]
    fn test_require_all_reports_first_gap() {
        let settings = Settings::new()
            .with_public_key("pub.pem")
            .with_symmetric_key("sym.key");

        let result =
            settings.require_all(&[Role::PublicKey, Role::SecretKey, Role::SymmetricKey]);
        assert!(matches!(
            result,
            Err(HybridError::MissingConfiguration {
                role: Role::SecretKey
            })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Settings::load(temp_dir.path().join(DEFAULT_SETTINGS_FILE));
        assert!(matches!(result, Err(HybridError::FileMissing { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_SETTINGS_FILE);
        fs::write(&path, b"{ not json").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn test_load_roundtrip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_SETTINGS_FILE);
        let settings = Settings::new()
            .with_public_key("a.pem")
            .with_encrypted_file("b.bin");
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
