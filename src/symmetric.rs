//! Symmetric bulk encryption: AES-128 in CBC mode with ANSI X9.23 padding

use crate::{error::HybridError, Result};
use aes::Aes128;
use cbc::cipher::{block_padding::AnsiX923, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Symmetric key size in bytes (128 bits)
pub const KEY_SIZE: usize = 16;
/// Cipher block size in bytes
pub const BLOCK_SIZE: usize = 16;
/// Initialization vector size in bytes, one block
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Symmetric key material that is zeroized on drop
pub struct SymmetricKey {
    key: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Create a key from raw bytes
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Create a key from a slice, which must be exactly `KEY_SIZE` bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let key: [u8; KEY_SIZE] = bytes.try_into().ok()?;
        Some(Self::new(key))
    }

    /// Get key bytes for cryptographic operations
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Persisted form of an encrypted file: `[iv:16][ciphertext]`.
///
/// There is no header, length field or authentication tag; the padding check
/// on decryption is the only integrity signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherEnvelope {
    pub iv: [u8; IV_SIZE],
    pub ciphertext: Vec<u8>,
}

impl CipherEnvelope {
    /// Serialize envelope to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(IV_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split raw bytes into IV and ciphertext
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < IV_SIZE {
            return Err(HybridError::MalformedInput {
                len: bytes.len(),
                min: IV_SIZE,
            });
        }

        let (iv, ciphertext) = bytes.split_at(IV_SIZE);
        let mut iv_bytes = [0u8; IV_SIZE];
        iv_bytes.copy_from_slice(iv);

        Ok(Self {
            iv: iv_bytes,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

/// Generate a fresh 128-bit key from the operating system CSPRNG
pub fn generate_key() -> SymmetricKey {
    let mut key = [0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut key);
    let generated = SymmetricKey::new(key);
    key.zeroize();
    generated
}

/// Encrypt `plaintext` under a freshly drawn IV
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> CipherEnvelope {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, key, iv)
}

fn encrypt_with_iv(plaintext: &[u8], key: &SymmetricKey, iv: [u8; IV_SIZE]) -> CipherEnvelope {
    let ciphertext = Aes128CbcEnc::new(key.as_bytes().into(), &iv.into())
        .encrypt_padded_vec_mut::<AnsiX923>(plaintext);

    CipherEnvelope { iv, ciphertext }
}

/// Decrypt an envelope and strip its padding.
///
/// Fails with `PaddingInvalid` when the ciphertext is not a whole number of
/// blocks or the recovered padding is malformed.
pub fn decrypt(envelope: &CipherEnvelope, key: &SymmetricKey) -> Result<Vec<u8>> {
    let ciphertext = &envelope.ciphertext;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(HybridError::PaddingInvalid);
    }

    Aes128CbcDec::new(key.as_bytes().into(), (&envelope.iv).into())
        .decrypt_padded_vec_mut::<AnsiX923>(ciphertext)
        .map_err(|_| HybridError::PaddingInvalid)
}
