use crate::config::model::crypto_suite::BccspConfig;
use serde::{Deserialize, Serialize};

/// The `client` section: who this process acts for and where it keeps
/// enrolled credentials.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Organization this client belongs to.
    #[serde(default)]
    pub organization: String,

    #[serde(default)]
    pub credential_store: CredentialStoreConfig,

    /// Root against which relative organization crypto paths are resolved.
    #[serde(default, rename = "cryptoconfig")]
    pub crypto_config: Option<PathConfig>,

    #[serde(default, rename = "BCCSP")]
    pub bccsp: Option<BccspConfig>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStoreConfig {
    /// Directory holding enrolled user certificates.
    #[serde(default)]
    pub path: String,

    /// Directory the software crypto suite keeps private keys in.
    #[serde(default)]
    pub crypto_store: Option<PathConfig>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathConfig {
    #[serde(default)]
    pub path: String,
}
