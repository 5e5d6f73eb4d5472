use crate::error::certificate::CertificateError;
use crate::error::crypto_suite::CryptoSuiteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreateSigningIdentityError {
    #[error("An enrollment certificate is required")]
    MissingCertificate(),

    #[error("A private key is required")]
    MissingPrivateKey(),

    #[error("Invalid enrollment certificate")]
    InvalidCertificate(#[source] CertificateError),

    #[error("Failed to import private key")]
    ImportPrivateKeyFailed(#[source] CryptoSuiteError),

    #[error("Private key does not match the certificate's public key")]
    KeyMismatch(),
}
