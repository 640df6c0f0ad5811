//! Tests for the engines and the key store working together

use hybrid_crypt::{
    asymmetric::{generate_keypair, unwrap_key, wrap_key, MAX_WRAP_PAYLOAD},
    key_store::{self, KeyMaterial, SaveOutcome},
    symmetric::{self, CipherEnvelope, KEY_SIZE},
    HybridError,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_symmetric_key_fits_wrap_payload() {
    assert!(KEY_SIZE <= MAX_WRAP_PAYLOAD);
}

#[test]
fn test_key_survives_store_and_wrap() {
    let temp_dir = TempDir::new().unwrap();
    let public_path = temp_dir.path().join("public.pem");
    let private_path = temp_dir.path().join("private.pem");
    let wrapped_path = temp_dir.path().join("symmetric.key");

    let (private_key, public_key) = generate_keypair().unwrap();
    let key = symmetric::generate_key();

    key_store::save(KeyMaterial::Public(&public_key), &public_path).unwrap();
    key_store::save(KeyMaterial::Private(&private_key), &private_path).unwrap();

    let loaded_public = key_store::load_public_key(&public_path).unwrap();
    let wrapped = wrap_key(&key, &loaded_public).unwrap();
    key_store::save(KeyMaterial::Wrapped(&wrapped), &wrapped_path).unwrap();

    let loaded_private = key_store::load_private_key(&private_path).unwrap();
    let loaded_wrapped = key_store::load_wrapped_key(&wrapped_path).unwrap();
    let recovered = unwrap_key(&loaded_wrapped, &loaded_private).unwrap();
    assert_eq!(recovered.as_bytes(), key.as_bytes());

    // Data encrypted under the original key opens with the recovered one
    let envelope = symmetric::encrypt(b"bulk data", &key);
    let bytes = envelope.to_bytes();
    let reopened = CipherEnvelope::from_bytes(&bytes).unwrap();
    assert_eq!(symmetric::decrypt(&reopened, &recovered).unwrap(), b"bulk data");
}

#[test]
fn test_saving_public_key_over_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("public.pem");
    fs::write(&path, b"placeholder").unwrap();

    let (_, public_key) = generate_keypair().unwrap();
    let outcome = key_store::save(KeyMaterial::Public(&public_key), &path).unwrap();

    assert_eq!(outcome, SaveOutcome::AlreadyExists);
    assert_eq!(fs::read(&path).unwrap(), b"placeholder");
}

#[test]
fn test_wrong_private_key_never_yields_bytes() {
    let (_, public_key) = generate_keypair().unwrap();
    let (other_private, _) = generate_keypair().unwrap();

    for _ in 0..4 {
        let wrapped = wrap_key(&symmetric::generate_key(), &public_key).unwrap();
        assert!(matches!(
            unwrap_key(&wrapped, &other_private),
            Err(HybridError::UnwrapFailure)
        ));
    }
}
