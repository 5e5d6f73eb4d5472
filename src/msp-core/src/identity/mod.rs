//! Signing identities and the per-organization managers that resolve them.
use crate::cryptosuite::{CryptoSuite, Key};
use crate::error::crypto_suite::CryptoSuiteError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub mod certificate;
pub mod enrollment;
pub mod identity_manager;
mod msp_store;
pub mod provider;
pub mod user_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use identity_manager::IdentityManager;
pub use provider::IdentityManagerProvider;

/// A user as seen by the network: the MSP that vouches for it and its name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityIdentifier {
    pub msp_id: String,
    pub id: String,
}

/// The public half of an identity as it is attached to requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SerializedIdentity {
    pub msp_id: String,

    /// PEM-encoded certificate.
    pub id_bytes: Vec<u8>,
}

/// A signing identity: an enrollment certificate bound to the private key
/// that the crypto suite holds for it.
#[derive(Clone)]
pub struct User {
    id: String,
    msp_id: String,
    enrollment_certificate: Vec<u8>,
    private_key: Key,
    crypto_suite: Arc<dyn CryptoSuite>,
}

impl User {
    pub(crate) fn new(
        id: &str,
        msp_id: &str,
        enrollment_certificate: Vec<u8>,
        private_key: Key,
        crypto_suite: Arc<dyn CryptoSuite>,
    ) -> Self {
        Self {
            id: id.to_string(),
            msp_id: msp_id.to_string(),
            enrollment_certificate,
            private_key,
            crypto_suite,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub fn identifier(&self) -> IdentityIdentifier {
        IdentityIdentifier {
            msp_id: self.msp_id.clone(),
            id: self.id.clone(),
        }
    }

    pub fn enrollment_certificate(&self) -> &[u8] {
        &self.enrollment_certificate
    }

    pub fn private_key(&self) -> &Key {
        &self.private_key
    }

    pub fn public_version(&self) -> SerializedIdentity {
        SerializedIdentity {
            msp_id: self.msp_id.clone(),
            id_bytes: self.enrollment_certificate.clone(),
        }
    }

    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, CryptoSuiteError> {
        self.crypto_suite.sign(&self.private_key, msg)
    }

    pub fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<bool, CryptoSuiteError> {
        self.crypto_suite
            .verify(&self.private_key.public_key(), signature, msg)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("msp_id", &self.msp_id)
            .field("ski", &self.private_key.ski_hex())
            .finish()
    }
}
