//! RSA key pairs and OAEP wrapping of symmetric keys

use crate::{
    error::HybridError,
    symmetric::{SymmetricKey, KEY_SIZE},
    Result,
};
use rand::rngs::OsRng;
use rsa::{traits::PublicKeyParts, BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

/// RSA modulus size in bits
pub const RSA_KEY_BITS: usize = 2048;
/// RSA public exponent
pub const RSA_PUBLIC_EXPONENT: u64 = 65537;
/// Length of a wrapped key, equal to the modulus length in bytes
pub const WRAPPED_KEY_SIZE: usize = RSA_KEY_BITS / 8;

/// SHA-256 output length, used for the OAEP overhead
const OAEP_HASH_SIZE: usize = 32;

/// Largest payload OAEP-SHA256 can carry under the fixed modulus
pub const MAX_WRAP_PAYLOAD: usize = WRAPPED_KEY_SIZE - 2 * OAEP_HASH_SIZE - 2;

const _: () = assert!(KEY_SIZE <= MAX_WRAP_PAYLOAD);

/// A symmetric key encrypted under an RSA public key with OAEP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedSymmetricKey {
    bytes: Vec<u8>,
}

impl WrappedSymmetricKey {
    /// Wrap raw ciphertext bytes read from storage
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Raw OAEP ciphertext
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Generate a 2048-bit RSA key pair with public exponent 65537
pub fn generate_keypair() -> Result<(RsaPrivateKey, RsaPublicKey)> {
    let exponent = BigUint::from(RSA_PUBLIC_EXPONENT);
    let private_key = RsaPrivateKey::new_with_exp(&mut OsRng, RSA_KEY_BITS, &exponent)
        .map_err(|e| HybridError::KeyGeneration(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    Ok((private_key, public_key))
}

/// Encrypt a symmetric key with RSA-OAEP (SHA-256 digest and MGF1, no label)
pub fn wrap_key(key: &SymmetricKey, public_key: &RsaPublicKey) -> Result<WrappedSymmetricKey> {
    let bytes = public_key
        .encrypt(&mut OsRng, oaep(), key.as_bytes())
        .map_err(|e| HybridError::Encoding {
            kind: "wrapped symmetric key",
            reason: e.to_string(),
        })?;

    Ok(WrappedSymmetricKey { bytes })
}

/// Recover a symmetric key wrapped by [`wrap_key`].
///
/// Any decoding problem, including a blob of the wrong length, a wrong
/// private key or a payload that is not exactly one symmetric key, is reported
/// as `UnwrapFailure`; no partial bytes are returned.
pub fn unwrap_key(
    wrapped: &WrappedSymmetricKey,
    private_key: &RsaPrivateKey,
) -> Result<SymmetricKey> {
    if wrapped.len() != private_key.size() {
        return Err(HybridError::UnwrapFailure);
    }

    let decrypted = Zeroizing::new(
        private_key
            .decrypt(oaep(), wrapped.as_bytes())
            .map_err(|_| HybridError::UnwrapFailure)?,
    );

    SymmetricKey::from_slice(&decrypted).ok_or(HybridError::UnwrapFailure)
}
