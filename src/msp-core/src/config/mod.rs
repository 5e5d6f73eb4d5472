pub mod backend;
pub mod model;

use crate::config::model::client::ClientConfig;
use crate::config::model::network::NetworkConfig;
use crate::error::config::ConfigError;
use std::path::Path;

/// Source of the client identity configuration.
pub trait IdentityConfig: Send + Sync {
    fn client(&self) -> Result<ClientConfig, ConfigError>;
}

/// Source of the organizations that make up the network.
pub trait EndpointConfig: Send + Sync {
    fn network_config(&self) -> &NetworkConfig;

    /// Root for relative organization crypto paths, if configured.
    fn crypto_config_path(&self) -> Option<&Path>;
}
