use crate::error::structured_file::StructuredFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No client section in the configuration")]
    ClientConfigMissing(),

    #[error("Invalid network configuration")]
    InvalidNetworkConfig(#[source] NetworkConfigError),

    #[error("Failed to load configuration file")]
    LoadConfigFileFailed(#[source] StructuredFileError),

    #[error("Failed to retrieve configuration: {0}")]
    RetrieveFailed(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkConfigError {
    #[error("Organization '{0}' is defined more than once (names are case-insensitive)")]
    DuplicateOrganization(String),

    #[error("User '{user}' of organization '{org}' is defined more than once (names are case-insensitive)")]
    DuplicateEmbeddedUser { org: String, user: String },
}
