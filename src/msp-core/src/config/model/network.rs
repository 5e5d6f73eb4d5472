use crate::error::config::NetworkConfigError;
use crate::error::config::NetworkConfigError::{DuplicateEmbeddedUser, DuplicateOrganization};
use crate::error::fs::FsError;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Every organization known to the network, keyed by lowercased name.
///
/// The map is only reachable through [`NetworkConfig::new`] or
/// deserialization, both of which normalize names.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawNetworkConfig")]
pub struct NetworkConfig {
    organizations: BTreeMap<String, OrganizationConfig>,
}

#[derive(Deserialize)]
struct RawNetworkConfig {
    #[serde(default)]
    organizations: BTreeMap<String, OrganizationConfig>,
}

impl TryFrom<RawNetworkConfig> for NetworkConfig {
    type Error = NetworkConfigError;

    fn try_from(raw: RawNetworkConfig) -> Result<Self, Self::Error> {
        Self::new(raw.organizations)
    }
}

impl NetworkConfig {
    /// Builds a network config, normalizing organization and embedded user
    /// names so lookups are case-insensitive. Names that collide once
    /// lowercased are rejected.
    pub fn new(
        organizations: BTreeMap<String, OrganizationConfig>,
    ) -> Result<Self, NetworkConfigError> {
        let mut normalized = BTreeMap::new();
        for (name, org) in organizations {
            let org = org.normalized(&name)?;
            match normalized.entry(name.to_lowercase()) {
                Entry::Occupied(_) => return Err(DuplicateOrganization(name)),
                Entry::Vacant(entry) => {
                    entry.insert(org);
                }
            }
        }
        Ok(Self {
            organizations: normalized,
        })
    }

    pub fn organizations(&self) -> &BTreeMap<String, OrganizationConfig> {
        &self.organizations
    }

    pub fn organization(&self, name: &str) -> Option<&OrganizationConfig> {
        self.organizations.get(&name.to_lowercase())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationConfig {
    #[serde(rename = "mspid", default)]
    pub msp_id: String,

    /// MSP directory of the organization's users. May contain a `{username}`
    /// (or `{userName}`) placeholder; relative paths are resolved against the
    /// client's crypto config root.
    #[serde(default)]
    pub crypto_path: String,

    /// Users whose certificate and key are given inline or by path.
    #[serde(default)]
    pub users: BTreeMap<String, EmbeddedUser>,

    #[serde(default)]
    pub peers: Vec<String>,

    #[serde(default)]
    pub certificate_authorities: Vec<String>,
}

impl OrganizationConfig {
    fn normalized(self, org_name: &str) -> Result<Self, NetworkConfigError> {
        let mut users = BTreeMap::new();
        for (name, user) in self.users {
            match users.entry(name.to_lowercase()) {
                Entry::Occupied(_) => {
                    return Err(DuplicateEmbeddedUser {
                        org: org_name.to_string(),
                        user: name,
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(user);
                }
            }
        }
        Ok(Self { users, ..self })
    }

    pub fn embedded_user(&self, name: &str) -> Option<&EmbeddedUser> {
        self.users.get(&name.to_lowercase())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddedUser {
    #[serde(default)]
    pub cert: MaterialSource,

    #[serde(default)]
    pub key: MaterialSource,
}

/// PEM material given either inline or as a file path. Inline wins when both
/// are present.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialSource {
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub pem: Option<String>,
}

impl MaterialSource {
    pub fn load(&self) -> Result<Option<Vec<u8>>, FsError> {
        if let Some(pem) = self.pem.as_ref().filter(|pem| !pem.is_empty()) {
            return Ok(Some(pem.as_bytes().to_vec()));
        }
        match &self.path {
            Some(path) => crate::fs::read(path).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn resolve_against(&mut self, base: &Path) {
        if let Some(path) = self.path.as_mut().filter(|path| path.is_relative()) {
            *path = base.join(&*path);
        }
    }
}
