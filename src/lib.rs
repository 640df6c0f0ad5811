//! hybrid-crypt - Hybrid file encryption
//!
//! A random 128-bit key encrypts file contents with AES-128-CBC; that key is
//! stored only in wrapped form, encrypted under a 2048-bit RSA public key with
//! OAEP-SHA256. Three operations are exposed: [`generate`], [`encrypt`] and
//! [`decrypt`], each driven by a [`Settings`] value naming the files involved.

pub mod asymmetric;
pub mod error;
pub mod file_io;
pub mod hybrid;
pub mod key_store;
pub mod settings;
pub mod symmetric;

pub use error::{ErrorKind, HybridError};
pub use hybrid::{decrypt, encrypt, generate, run, Mode};
pub use settings::{Role, Settings};

/// Library result type
pub type Result<T> = std::result::Result<T, HybridError>;
