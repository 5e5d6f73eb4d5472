//! The capability the identity layer signs and verifies through.
//!
//! Identity managers only ever see `Arc<dyn CryptoSuite>`; which backend sits
//! behind it is decided once by [`crate::factory::CoreProviderFactory`].
pub mod keystore;
pub mod sw;

use crate::error::crypto_suite::CryptoSuiteError;
use sha2::{Digest, Sha256};

pub use keystore::KeyStore;
pub use sw::SoftwareCryptoSuite;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAlgorithm {
    EcdsaP256,
}

/// Handle to a key held by a crypto suite. Private key bytes never leave the
/// suite; the handle carries the public point and the subject key identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    algorithm: KeyAlgorithm,
    ski: Vec<u8>,
    public_key: Vec<u8>,
    private: bool,
}

impl Key {
    pub(crate) fn new(algorithm: KeyAlgorithm, public_key: Vec<u8>, private: bool) -> Self {
        Self {
            algorithm,
            ski: ski_for_public_key(&public_key),
            public_key,
            private,
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn ski(&self) -> &[u8] {
        &self.ski
    }

    pub fn ski_hex(&self) -> String {
        hex::encode(&self.ski)
    }

    /// Uncompressed SEC1 public point.
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn public_key(&self) -> Key {
        Key {
            private: false,
            ..self.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyGenOptions {
    pub algorithm: KeyAlgorithm,

    /// Ephemeral keys are kept in memory only.
    pub ephemeral: bool,
}

impl Default for KeyGenOptions {
    fn default() -> Self {
        Self {
            algorithm: KeyAlgorithm::EcdsaP256,
            ephemeral: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyImportOptions {
    pub ephemeral: bool,
}

pub trait CryptoSuite: Send + Sync {
    fn key_gen(&self, opts: &KeyGenOptions) -> Result<Key, CryptoSuiteError>;

    /// Imports a PKCS#8 `PRIVATE KEY` PEM block.
    fn key_import(&self, pem: &[u8], opts: &KeyImportOptions) -> Result<Key, CryptoSuiteError>;

    /// Writes a key the suite holds, typically one generated as ephemeral, to
    /// its key store.
    fn persist_key(&self, key: &Key) -> Result<(), CryptoSuiteError>;

    /// Fails with [`CryptoSuiteError::KeyNotFound`] for unknown identifiers.
    fn get_key(&self, ski: &[u8]) -> Result<Key, CryptoSuiteError>;

    fn hash(&self, msg: &[u8]) -> Result<Vec<u8>, CryptoSuiteError>;

    fn sign(&self, key: &Key, msg: &[u8]) -> Result<Vec<u8>, CryptoSuiteError>;

    /// `Ok(false)` means the signature does not verify.
    fn verify(&self, key: &Key, signature: &[u8], msg: &[u8]) -> Result<bool, CryptoSuiteError>;
}

/// Subject key identifier: SHA-256 of the uncompressed public point.
pub fn ski_for_public_key(public_key: &[u8]) -> Vec<u8> {
    Sha256::digest(public_key).to_vec()
}
