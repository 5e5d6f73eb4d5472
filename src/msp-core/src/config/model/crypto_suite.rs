use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SOFTWARE_PROVIDER: &str = "SW";
pub const SHA2_HASH_FAMILY: &str = "SHA2";
pub const DEFAULT_SECURITY_LEVEL: u32 = 256;

/// The `BCCSP` block as written in configuration files.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BccspConfig {
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub default: ProviderConfig,

    #[serde(default = "default_hash_family")]
    pub hash_algorithm: String,

    #[serde(default = "default_true")]
    pub soft_verify: bool,

    #[serde(default = "default_level")]
    pub level: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default: ProviderConfig::default(),
            hash_algorithm: default_hash_family(),
            soft_verify: true,
            level: DEFAULT_SECURITY_LEVEL,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
        }
    }
}

/// Resolved settings the core factory builds a crypto suite from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CryptoSuiteConfig {
    pub security_enabled: bool,
    pub provider: String,
    pub hash_family: String,
    pub security_level: u32,
    pub soft_verify: bool,

    /// Where private keys are persisted. Keys only live in memory when unset.
    pub key_store_path: Option<PathBuf>,
}

impl CryptoSuiteConfig {
    pub fn from_security(security: &SecurityConfig, key_store_path: Option<PathBuf>) -> Self {
        Self {
            security_enabled: security.enabled,
            provider: security.default.provider.clone(),
            hash_family: security.hash_algorithm.clone(),
            security_level: security.level,
            soft_verify: security.soft_verify,
            key_store_path,
        }
    }
}

impl Default for CryptoSuiteConfig {
    fn default() -> Self {
        Self::from_security(&SecurityConfig::default(), None)
    }
}

fn default_true() -> bool {
    true
}

fn default_provider() -> String {
    SOFTWARE_PROVIDER.to_string()
}

fn default_hash_family() -> String {
    SHA2_HASH_FAMILY.to_string()
}

fn default_level() -> u32 {
    DEFAULT_SECURITY_LEVEL
}
