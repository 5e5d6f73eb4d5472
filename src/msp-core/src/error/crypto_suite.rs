use crate::error::kvstore::KeyValueStoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoSuiteError {
    #[error("Failed to decode PEM key material")]
    DecodeKeyPemFailed(#[source] pem::PemError),

    #[error("Failed to generate key")]
    GenerateKeyFailed(#[source] ring::error::Unspecified),

    #[error("Key with SKI {0} is not a private key")]
    NotAPrivateKey(String),

    #[error("Key with SKI {0} not found")]
    KeyNotFound(String),

    #[error("Key material was rejected")]
    KeyRejected(#[source] ring::error::KeyRejected),

    #[error("Key store access failed")]
    KeyStoreFailed(#[source] KeyValueStoreError),

    #[error("Signing failed")]
    SignFailed(#[source] ring::error::Unspecified),

    #[error("Unsupported key PEM block '{0}', expected 'PRIVATE KEY'")]
    UnsupportedKeyFormat(String),
}
