pub mod client;
pub mod crypto_suite;
pub mod network;

use crate::config::model::client::ClientConfig;
use crate::config::model::network::OrganizationConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level shape of an SDK configuration file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SdkConfig {
    pub client: Option<ClientConfig>,

    #[serde(default)]
    pub organizations: BTreeMap<String, OrganizationConfig>,
}
