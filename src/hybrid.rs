//! Hybrid operations: key generation, file encryption and file decryption
//!
//! Each operation checks that every path it needs is configured before any
//! key or file is touched, then runs to completion or stops at the first
//! failure. Operations share no state other than the files they read and
//! write.

use crate::{
    asymmetric::{self, WrappedSymmetricKey},
    file_io,
    key_store::{self, KeyMaterial, SaveOutcome},
    settings::{Role, Settings},
    symmetric::{self, CipherEnvelope, SymmetricKey},
    Result,
};
use rsa::RsaPublicKey;
use std::path::Path;
use tracing::{debug, info, warn};

/// Operating mode selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create the key pair and the wrapped symmetric key
    Generate,
    /// Encrypt the initial file into the encrypted file
    Encrypt,
    /// Decrypt the encrypted file into the decrypted file
    Decrypt,
}

impl Mode {
    /// Settings entries the mode cannot run without
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Self::Generate => &[Role::PublicKey, Role::SecretKey, Role::SymmetricKey],
            Self::Encrypt => &[
                Role::SymmetricKey,
                Role::SecretKey,
                Role::InitialFile,
                Role::EncryptedFile,
            ],
            Self::Decrypt => &[
                Role::SymmetricKey,
                Role::SecretKey,
                Role::EncryptedFile,
                Role::DecryptedFile,
            ],
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generate => write!(f, "Generate"),
            Self::Encrypt => write!(f, "Encrypt"),
            Self::Decrypt => write!(f, "Decrypt"),
        }
    }
}

/// Run the operation selected by `mode`
pub fn run(mode: Mode, settings: &Settings) -> Result<()> {
    match mode {
        Mode::Generate => generate(settings),
        Mode::Encrypt => encrypt(settings),
        Mode::Decrypt => decrypt(settings),
    }
}

/// Save key material, reporting a skipped write
fn save_logged(material: KeyMaterial<'_>, path: &Path) -> Result<SaveOutcome> {
    let outcome = key_store::save(material, path)?;
    if outcome == SaveOutcome::AlreadyExists {
        warn!(
            kind = material.kind(),
            path = %path.display(),
            "File already exists, leaving it untouched"
        );
    }
    Ok(outcome)
}

/// Generate a symmetric key and an RSA key pair, then persist the public key,
/// the private key and the wrapped symmetric key.
///
/// Existing files are kept. The symmetric key is always wrapped under the
/// public half of the private key that ends up on disk, so the stored
/// wrapped key can be unwrapped with the stored private key even when an
/// earlier run already created it.
pub fn generate(settings: &Settings) -> Result<()> {
    settings.require_all(Mode::Generate.required_roles())?;
    let public_path = settings.require(Role::PublicKey)?;
    let private_path = settings.require(Role::SecretKey)?;
    let wrapped_path = settings.require(Role::SymmetricKey)?;

    info!("Generating keys");

    debug!("Generating symmetric key");
    let symmetric_key = symmetric::generate_key();

    debug!(bits = asymmetric::RSA_KEY_BITS, "Generating RSA key pair");
    let (private_key, public_key) = asymmetric::generate_keypair()?;

    save_logged(KeyMaterial::Public(&public_key), public_path)?;

    let wrapping_key = match save_logged(KeyMaterial::Private(&private_key), private_path)? {
        SaveOutcome::Written => public_key,
        SaveOutcome::AlreadyExists => {
            RsaPublicKey::from(&key_store::load_private_key(private_path)?)
        }
    };

    debug!("Wrapping symmetric key");
    let wrapped = asymmetric::wrap_key(&symmetric_key, &wrapping_key)?;
    save_logged(KeyMaterial::Wrapped(&wrapped), wrapped_path)?;

    info!("Key generation complete");
    Ok(())
}

/// Load the private key and the wrapped key named in `settings` and unwrap
/// the symmetric key
fn recover_symmetric_key(settings: &Settings) -> Result<SymmetricKey> {
    let wrapped_path = settings.require(Role::SymmetricKey)?;
    let private_path = settings.require(Role::SecretKey)?;

    file_io::require_file(wrapped_path)?;
    file_io::require_file(private_path)?;

    debug!(path = %wrapped_path.display(), "Loading wrapped symmetric key");
    let wrapped: WrappedSymmetricKey = key_store::load_wrapped_key(wrapped_path)?;

    debug!(path = %private_path.display(), "Loading private key");
    let private_key = key_store::load_private_key(private_path)?;

    debug!("Unwrapping symmetric key");
    asymmetric::unwrap_key(&wrapped, &private_key)
}

/// Encrypt the initial file with the stored symmetric key and write
/// `[iv][ciphertext]` to the encrypted file
pub fn encrypt(settings: &Settings) -> Result<()> {
    settings.require_all(Mode::Encrypt.required_roles())?;
    let input_path = settings.require(Role::InitialFile)?;
    let output_path = settings.require(Role::EncryptedFile)?;

    info!(input = %input_path.display(), "Encrypting file");
    file_io::require_file(input_path)?;

    let key = recover_symmetric_key(settings)?;
    let plaintext = file_io::read_existing(input_path)?;

    let envelope = symmetric::encrypt(&plaintext, &key);
    file_io::write_replacing(output_path, &envelope.to_bytes())?;

    info!(output = %output_path.display(), "Encryption complete");
    Ok(())
}

/// Decrypt the encrypted file with the stored symmetric key and write the
/// plaintext to the decrypted file
pub fn decrypt(settings: &Settings) -> Result<()> {
    settings.require_all(Mode::Decrypt.required_roles())?;
    let input_path = settings.require(Role::EncryptedFile)?;
    let output_path = settings.require(Role::DecryptedFile)?;

    info!(input = %input_path.display(), "Decrypting file");
    file_io::require_file(input_path)?;

    let key = recover_symmetric_key(settings)?;
    let data = file_io::read_existing(input_path)?;

    let envelope = CipherEnvelope::from_bytes(&data)?;
    let plaintext = symmetric::decrypt(&envelope, &key)?;
    file_io::write_replacing(output_path, &plaintext)?;

    info!(output = %output_path.display(), "Decryption complete");
    Ok(())
}
