use crate::config::{EndpointConfig, IdentityConfig};
use crate::cryptosuite::CryptoSuite;
use crate::error::factory::CreateUserStoreError::{
    CredentialStorePathNotConfigured, GetClientConfigFailed,
};
use crate::error::factory::{CreateIdentityManagerProviderError, CreateUserStoreError};
use crate::identity::user_store::{CertFileUserStore, UserStore};
use crate::identity::{IdentityManager, IdentityManagerProvider};
use slog::{debug, Logger};
use std::sync::Arc;

/// Builds the credential store and the identity manager provider. Holds no
/// state besides its logger, so every call yields independent objects.
pub struct ProviderFactory {
    log: Logger,
}

impl ProviderFactory {
    pub fn new(log: &Logger) -> Self {
        Self { log: log.clone() }
    }

    /// Creates the store for enrolled user credentials. Nothing is written
    /// until the first user is stored.
    pub fn create_user_store(
        &self,
        config: &dyn IdentityConfig,
    ) -> Result<Arc<dyn UserStore>, CreateUserStoreError> {
        let client = config.client().map_err(GetClientConfigFailed)?;
        let path = client.credential_store.path;
        if path.is_empty() {
            return Err(CredentialStorePathNotConfigured());
        }
        debug!(self.log, "Credential store rooted at {}", path);
        Ok(Arc::new(CertFileUserStore::new(path)))
    }

    /// Creates one identity manager per organization in the network
    /// configuration. A single failing organization fails the whole call.
    pub fn create_identity_manager_provider(
        &self,
        endpoint_config: &dyn EndpointConfig,
        crypto_suite: Arc<dyn CryptoSuite>,
        user_store: Arc<dyn UserStore>,
    ) -> Result<IdentityManagerProvider, CreateIdentityManagerProviderError> {
        let managers = endpoint_config
            .network_config()
            .organizations()
            .keys()
            .map(|org_name| {
                IdentityManager::new(
                    &self.log,
                    org_name,
                    user_store.clone(),
                    crypto_suite.clone(),
                    endpoint_config,
                )
                .map_err(|source| {
                    CreateIdentityManagerProviderError::NewIdentityManagerFailed {
                        org: org_name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            self.log,
            "Created identity managers for {} organizations",
            managers.len()
        );
        Ok(IdentityManagerProvider::new(managers))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new(&Logger::root(slog::Discard, slog::o!()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::backend::ConfigBackend;
    use crate::config::model::client::{ClientConfig, CredentialStoreConfig};
    use crate::config::model::network::{NetworkConfig, OrganizationConfig};
    use crate::cryptosuite::{KeyStore, SoftwareCryptoSuite};
    use crate::error::config::ConfigError;
    use crate::error::identity::new_identity_manager::NewIdentityManagerError;
    use crate::factory::CoreProviderFactory;
    use crate::identity::certificate::ski_from_certificate;
    use crate::identity::test_support::{test_logger, TestCertificateAuthority};
    use crate::identity::user_store::UserData;
    use crate::identity::IdentityIdentifier;
    use std::collections::BTreeMap;
    use std::error::Error;
    use std::path::{Path, PathBuf};

    struct StubIdentityConfig {
        credential_store_path: String,
    }

    impl IdentityConfig for StubIdentityConfig {
        fn client(&self) -> Result<ClientConfig, ConfigError> {
            Ok(ClientConfig {
                credential_store: CredentialStoreConfig {
                    path: self.credential_store_path.clone(),
                    crypto_store: None,
                },
                ..Default::default()
            })
        }
    }

    struct FailingIdentityConfig;

    impl IdentityConfig for FailingIdentityConfig {
        fn client(&self) -> Result<ClientConfig, ConfigError> {
            Err(ConfigError::RetrieveFailed("backend offline".to_string()))
        }
    }

    struct StubEndpointConfig {
        network: NetworkConfig,
    }

    impl EndpointConfig for StubEndpointConfig {
        fn network_config(&self) -> &NetworkConfig {
            &self.network
        }

        fn crypto_config_path(&self) -> Option<&Path> {
            None
        }
    }

    fn endpoint_with(orgs: &[(&str, &str, &str)]) -> StubEndpointConfig {
        let organizations: BTreeMap<_, _> = orgs
            .iter()
            .map(|(name, msp_id, crypto_path)| {
                (
                    name.to_string(),
                    OrganizationConfig {
                        msp_id: msp_id.to_string(),
                        crypto_path: crypto_path.to_string(),
                        ..Default::default()
                    },
                )
            })
            .collect();
        StubEndpointConfig {
            network: NetworkConfig::new(organizations).unwrap(),
        }
    }

    fn suite() -> Arc<dyn CryptoSuite> {
        Arc::new(SoftwareCryptoSuite::new(KeyStore::in_memory()))
    }

    fn factory() -> ProviderFactory {
        ProviderFactory::new(&test_logger())
    }

    #[test]
    fn creates_user_store_for_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("fabsdk_test").join("store");
        let config = StubIdentityConfig {
            credential_store_path: root.to_string_lossy().into_owned(),
        };

        let store = factory().create_user_store(&config).unwrap();
        assert!(!root.exists());

        let alice = UserData {
            id: "alice".to_string(),
            msp_id: "Org1".to_string(),
            enrollment_certificate: b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n"
                .to_vec(),
        };
        store.store(&alice).unwrap();
        let loaded = store
            .load(&IdentityIdentifier {
                msp_id: "Org1".to_string(),
                id: "alice".to_string(),
            })
            .unwrap();

        assert_eq!(loaded.enrollment_certificate, alice.enrollment_certificate);
    }

    #[test]
    fn empty_credential_store_path_is_a_configuration_error() {
        let config = StubIdentityConfig {
            credential_store_path: String::new(),
        };

        assert!(matches!(
            factory().create_user_store(&config),
            Err(CredentialStorePathNotConfigured())
        ));
    }

    #[test]
    fn client_config_failure_is_wrapped() {
        let err = match factory().create_user_store(&FailingIdentityConfig) {
            Err(err) => err,
            Ok(_) => panic!("user store created without client config"),
        };

        assert!(matches!(
            err,
            GetClientConfigFailed(ConfigError::RetrieveFailed(_))
        ));
        assert_eq!(
            err.source().unwrap().to_string(),
            "Failed to retrieve configuration: backend offline"
        );
    }

    #[test]
    fn each_call_yields_an_isolated_store() {
        let first_dir = tempfile::tempdir().unwrap();
        let second_dir = tempfile::tempdir().unwrap();
        let first = factory()
            .create_user_store(&StubIdentityConfig {
                credential_store_path: first_dir.path().to_string_lossy().into_owned(),
            })
            .unwrap();
        let second = factory()
            .create_user_store(&StubIdentityConfig {
                credential_store_path: second_dir.path().to_string_lossy().into_owned(),
            })
            .unwrap();
        let user = UserData {
            id: "alice".to_string(),
            msp_id: "Org1MSP".to_string(),
            enrollment_certificate: b"cert".to_vec(),
        };

        first.store(&user).unwrap();

        assert!(second.load(&user.identifier()).is_err());
    }

    #[test]
    fn provider_has_a_manager_per_organization() {
        let dir = tempfile::tempdir().unwrap();
        let store = factory()
            .create_user_store(&StubIdentityConfig {
                credential_store_path: dir.path().to_string_lossy().into_owned(),
            })
            .unwrap();
        let endpoint = endpoint_with(&[
            ("Org1", "Org1MSP", "org1/msp"),
            ("Org2", "Org2MSP", "org2/msp"),
        ]);

        let provider = factory()
            .create_identity_manager_provider(&endpoint, suite(), store)
            .unwrap();

        assert_eq!(
            provider.identity_manager("Org1").unwrap().msp_id(),
            "Org1MSP"
        );
        assert_eq!(
            provider.identity_manager("Org2").unwrap().msp_id(),
            "Org2MSP"
        );
        assert!(provider.identity_manager("OrgX").is_none());
        assert_eq!(
            provider.organizations().collect::<Vec<_>>(),
            ["org1", "org2"]
        );
    }

    #[test]
    fn deserialized_network_config_finds_mixed_case_organizations() {
        let endpoint = StubEndpointConfig {
            network: serde_json::from_str(
                r#"{
                    "organizations": {
                        "Org1": { "mspid": "Org1MSP", "cryptoPath": "org1/msp" },
                        "Org2": { "mspid": "Org2MSP", "cryptoPath": "org2/msp" }
                    }
                }"#,
            )
            .unwrap(),
        };
        let store: Arc<dyn UserStore> = Arc::new(CertFileUserStore::new("unused"));

        let provider = factory()
            .create_identity_manager_provider(&endpoint, suite(), store)
            .unwrap();

        assert_eq!(
            provider.identity_manager("Org1").unwrap().msp_id(),
            "Org1MSP"
        );
        assert!(provider.identity_manager("Org2").is_some());
        assert!(provider.identity_manager("OrgX").is_none());
    }

    #[test]
    fn one_misconfigured_organization_fails_the_provider() {
        let endpoint = endpoint_with(&[
            ("Org1", "Org1MSP", "org1/msp"),
            ("Org2", "Org2MSP", ""),
        ]);
        let store: Arc<dyn UserStore> = Arc::new(CertFileUserStore::new("unused"));

        let err = match factory().create_identity_manager_provider(&endpoint, suite(), store) {
            Err(err) => err,
            Ok(_) => panic!("provider created with a misconfigured organization"),
        };

        let CreateIdentityManagerProviderError::NewIdentityManagerFailed { org, source } = err;
        assert_eq!(org, "org2");
        assert!(matches!(
            source,
            NewIdentityManagerError::NoCryptoPathOrEmbeddedUsers(_)
        ));
    }

    #[test]
    fn concurrent_lookups_share_one_provider() {
        let endpoint = endpoint_with(&[
            ("Org1", "Org1MSP", "org1/msp"),
            ("Org2", "Org2MSP", "org2/msp"),
        ]);
        let store: Arc<dyn UserStore> = Arc::new(CertFileUserStore::new("unused"));
        let provider = Arc::new(
            factory()
                .create_identity_manager_provider(&endpoint, suite(), store)
                .unwrap(),
        );

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let provider = provider.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let org = if i % 2 == 0 { "Org1" } else { "org2" };
                        assert!(provider.identity_manager(org).is_some());
                        assert!(provider.identity_manager("OrgX").is_none());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    fn write_config(dir: &Path) -> PathBuf {
        let config = r#"{
            "client": {
                "organization": "Org1",
                "credentialStore": {
                    "path": "state-store",
                    "cryptoStore": { "path": "msp-keys" }
                },
                "cryptoconfig": { "path": "crypto-config" }
            },
            "organizations": {
                "Org1": {
                    "mspid": "Org1MSP",
                    "cryptoPath": "peerOrganizations/org1.example.com/users/{username}@org1.example.com/msp"
                },
                "Org2": {
                    "mspid": "Org2MSP",
                    "cryptoPath": "peerOrganizations/org2.example.com/users/{username}@org2.example.com/msp"
                }
            }
        }"#;
        let path = dir.join("config.json");
        std::fs::write(&path, config).unwrap();
        path
    }

    #[test]
    fn end_to_end_from_configuration_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ConfigBackend::from_file(&write_config(dir.path())).unwrap();
        let log = test_logger();

        let crypto_suite = CoreProviderFactory::new(&log)
            .create_crypto_suite_provider(backend.crypto_suite_config())
            .unwrap();
        let factory = ProviderFactory::new(&log);
        let user_store = factory.create_user_store(&backend).unwrap();
        let provider = factory
            .create_identity_manager_provider(&backend, crypto_suite, user_store)
            .unwrap();

        let manager = provider.identity_manager("Org1").unwrap();
        let err = manager.get_signing_identity("alice").unwrap_err();
        assert!(err.is_user_not_found());

        let ca = TestCertificateAuthority::new();
        ca.register("alice", "alicepw");
        manager.enroll(&ca, "alice", "alicepw").unwrap();

        let identity = manager.get_signing_identity("alice").unwrap();
        let stored = std::fs::read(dir.path().join("state-store/alice@Org1MSP-cert.pem")).unwrap();
        assert_eq!(identity.enrollment_certificate(), stored.as_slice());
        let key_file = dir
            .path()
            .join("msp-keys")
            .join(format!("{}_sk", hex::encode(ski_from_certificate(&stored).unwrap())));
        assert!(key_file.is_file());

        // A second client context over the same directories sees the user.
        let crypto_suite = CoreProviderFactory::new(&log)
            .create_crypto_suite_provider(backend.crypto_suite_config())
            .unwrap();
        let user_store = factory.create_user_store(&backend).unwrap();
        let provider = factory
            .create_identity_manager_provider(&backend, crypto_suite, user_store)
            .unwrap();
        let reloaded = provider
            .identity_manager("org1")
            .unwrap()
            .get_signing_identity("alice")
            .unwrap();
        let signature = reloaded.sign(b"proposal").unwrap();
        assert!(identity.verify(b"proposal", &signature).unwrap());

        // Enrollment is per organization.
        assert!(provider
            .identity_manager("Org2")
            .unwrap()
            .get_signing_identity("alice")
            .unwrap_err()
            .is_user_not_found());
    }
}
