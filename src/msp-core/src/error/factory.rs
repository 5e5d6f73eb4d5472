use crate::error::config::ConfigError;
use crate::error::identity::new_identity_manager::NewIdentityManagerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreateUserStoreError {
    #[error("Failed to retrieve client configuration")]
    GetClientConfigFailed(#[source] ConfigError),

    #[error("Credential store path not configured")]
    CredentialStorePathNotConfigured(),
}

#[derive(Error, Debug)]
pub enum CreateIdentityManagerProviderError {
    #[error("Failed to create identity manager for organization '{org}'")]
    NewIdentityManagerFailed {
        org: String,
        source: NewIdentityManagerError,
    },
}

#[derive(Error, Debug)]
pub enum CreateCryptoSuiteError {
    #[error("Security is disabled in the crypto suite configuration")]
    SecurityDisabled(),

    #[error("Unsupported crypto suite provider '{0}'")]
    UnsupportedProvider(String),

    #[error("Unsupported hash family '{0}'")]
    UnsupportedHashFamily(String),

    #[error("Unsupported security level {0}")]
    UnsupportedSecurityLevel(u32),
}
