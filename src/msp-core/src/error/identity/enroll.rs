use crate::error::certificate::CertificateError;
use crate::error::crypto_suite::CryptoSuiteError;
use crate::error::identity::enrollment_service::EnrollmentServiceError;
use crate::error::identity::user_store::UserStoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("Enrollment ID is required")]
    EmptyEnrollmentId(),

    #[error("Enrollment secret is required")]
    EmptySecret(),

    #[error("Failed to generate key for '{0}'")]
    GenerateKeyFailed(String, #[source] CryptoSuiteError),

    #[error("Enrollment of '{0}' failed")]
    EnrollmentServiceFailed(String, #[source] EnrollmentServiceError),

    #[error("Enrollment service returned an invalid certificate for '{0}'")]
    InvalidCertificate(String, #[source] CertificateError),

    #[error("Certificate issued for '{0}' does not carry the requested public key")]
    CertificateKeyMismatch(String),

    #[error("Failed to persist the private key of '{0}'")]
    PersistKeyFailed(String, #[source] CryptoSuiteError),

    #[error("Failed to store enrolled user '{0}'")]
    StoreUserFailed(String, #[source] UserStoreError),
}
