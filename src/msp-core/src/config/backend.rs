//! Typed configuration loaded from a JSON file.
//!
//! Relative paths in the file are resolved against the directory containing
//! it, so a configuration and its fixtures can be moved together. The one
//! exception is an organization's relative `cryptoPath` when `cryptoconfig`
//! is set: it is resolved against the crypto config root instead.
use crate::config::model::client::ClientConfig;
use crate::config::model::crypto_suite::CryptoSuiteConfig;
use crate::config::model::network::NetworkConfig;
use crate::config::model::SdkConfig;
use crate::config::{EndpointConfig, IdentityConfig};
use crate::error::config::ConfigError;
use crate::error::config::ConfigError::{
    ClientConfigMissing, InvalidNetworkConfig, LoadConfigFileFailed,
};
use crate::json::load_json_file;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct ConfigBackend {
    client: Option<ClientConfig>,
    network: NetworkConfig,
    crypto_config_path: Option<PathBuf>,
    crypto_suite: CryptoSuiteConfig,
}

impl ConfigBackend {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: SdkConfig = load_json_file(path).map_err(LoadConfigFileFailed)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_model(config, base)
    }

    pub fn from_model(config: SdkConfig, base: &Path) -> Result<Self, ConfigError> {
        let resolve = |raw: &str| -> Option<PathBuf> {
            if raw.is_empty() {
                None
            } else {
                Some(base.join(raw))
            }
        };

        let mut client = config.client;
        if let Some(client) = client.as_mut() {
            if let Some(path) = resolve(&client.credential_store.path) {
                client.credential_store.path = path.to_string_lossy().into_owned();
            }
            if let Some(crypto_store) = client.credential_store.crypto_store.as_mut() {
                if let Some(path) = resolve(&crypto_store.path) {
                    crypto_store.path = path.to_string_lossy().into_owned();
                }
            }
        }

        let crypto_config_path = client
            .as_ref()
            .and_then(|c| c.crypto_config.as_ref())
            .and_then(|c| resolve(&c.path));
        let key_store_path = client
            .as_ref()
            .and_then(|c| c.credential_store.crypto_store.as_ref())
            .and_then(|c| resolve(&c.path));
        let crypto_suite = match client.as_ref().and_then(|c| c.bccsp.as_ref()) {
            Some(bccsp) => CryptoSuiteConfig::from_security(&bccsp.security, key_store_path),
            None => CryptoSuiteConfig {
                key_store_path,
                ..CryptoSuiteConfig::default()
            },
        };

        let mut organizations = config.organizations;
        for org in organizations.values_mut() {
            let crypto_path = Path::new(&org.crypto_path);
            if crypto_config_path.is_none() && crypto_path.is_relative() {
                if let Some(path) = resolve(&org.crypto_path) {
                    org.crypto_path = path.to_string_lossy().into_owned();
                }
            }
            for user in org.users.values_mut() {
                user.cert.resolve_against(base);
                user.key.resolve_against(base);
            }
        }

        Ok(Self {
            client,
            network: NetworkConfig::new(organizations).map_err(InvalidNetworkConfig)?,
            crypto_config_path,
            crypto_suite,
        })
    }

    pub fn crypto_suite_config(&self) -> &CryptoSuiteConfig {
        &self.crypto_suite
    }
}

impl IdentityConfig for ConfigBackend {
    fn client(&self) -> Result<ClientConfig, ConfigError> {
        self.client.clone().ok_or(ClientConfigMissing())
    }
}

impl EndpointConfig for ConfigBackend {
    fn network_config(&self) -> &NetworkConfig {
        &self.network
    }

    fn crypto_config_path(&self) -> Option<&Path> {
        self.crypto_config_path.as_deref()
    }
}
