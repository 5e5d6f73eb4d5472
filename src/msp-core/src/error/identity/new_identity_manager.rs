use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewIdentityManagerError {
    #[error("Organization '{0}' is not defined in the network configuration")]
    OrganizationNotConfigured(String),

    #[error("Organization '{0}' has no MSP ID configured")]
    MspIdNotConfigured(String),

    #[error("Organization '{0}' needs either a crypto path or an embedded list of users")]
    NoCryptoPathOrEmbeddedUsers(String),
}
