use crate::error::certificate::CertificateError;
use crate::error::crypto_suite::CryptoSuiteError;
use crate::error::fs::FsError;
use crate::error::identity::user_store::UserStoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GetSigningIdentityError {
    #[error("Loading user '{0}' from the user store failed")]
    LoadUserFailed(String, #[source] UserStoreError),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Failed to read certificate of user '{0}'")]
    ReadCertificateFailed(String, #[source] FsError),

    #[error("Invalid enrollment certificate for user '{0}'")]
    InvalidCertificate(String, #[source] CertificateError),

    #[error("Failed to read private key of user '{0}'")]
    ReadPrivateKeyFailed(String, #[source] FsError),

    #[error("Failed to import private key of user '{0}'")]
    ImportPrivateKeyFailed(String, #[source] CryptoSuiteError),

    #[error("Failed to look up private key of user '{0}'")]
    GetPrivateKeyFailed(String, #[source] CryptoSuiteError),

    #[error("Unable to find private key for user '{0}'")]
    PrivateKeyNotFound(String),
}

impl GetSigningIdentityError {
    /// Whether the user has never been enrolled or provisioned for this
    /// organization. Callers can recover from this by enrolling.
    pub fn is_user_not_found(&self) -> bool {
        matches!(self, GetSigningIdentityError::UserNotFound(_))
    }
}
