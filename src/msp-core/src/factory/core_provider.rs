use crate::config::model::crypto_suite::{
    CryptoSuiteConfig, DEFAULT_SECURITY_LEVEL, SHA2_HASH_FAMILY, SOFTWARE_PROVIDER,
};
use crate::cryptosuite::{CryptoSuite, KeyStore, SoftwareCryptoSuite};
use crate::error::factory::CreateCryptoSuiteError;
use crate::error::factory::CreateCryptoSuiteError::{
    SecurityDisabled, UnsupportedHashFamily, UnsupportedProvider, UnsupportedSecurityLevel,
};
use slog::{debug, warn, Logger};
use std::sync::Arc;

/// Builds the crypto suite shared by every identity manager of a client.
pub struct CoreProviderFactory {
    log: Logger,
}

impl CoreProviderFactory {
    pub fn new(log: &Logger) -> Self {
        Self { log: log.clone() }
    }

    pub fn create_crypto_suite_provider(
        &self,
        config: &CryptoSuiteConfig,
    ) -> Result<Arc<dyn CryptoSuite>, CreateCryptoSuiteError> {
        if !config.security_enabled {
            return Err(SecurityDisabled());
        }
        if !config.provider.eq_ignore_ascii_case(SOFTWARE_PROVIDER) {
            return Err(UnsupportedProvider(config.provider.clone()));
        }
        if !config.hash_family.eq_ignore_ascii_case(SHA2_HASH_FAMILY) {
            return Err(UnsupportedHashFamily(config.hash_family.clone()));
        }
        if config.security_level != DEFAULT_SECURITY_LEVEL {
            return Err(UnsupportedSecurityLevel(config.security_level));
        }

        let key_store = match &config.key_store_path {
            Some(path) => {
                debug!(self.log, "Software crypto suite keeps keys in {}", path.display());
                KeyStore::file(path)
            }
            None => {
                warn!(
                    self.log,
                    "No key store path configured, private keys are kept in memory only"
                );
                KeyStore::in_memory()
            }
        };
        Ok(Arc::new(
            SoftwareCryptoSuite::new(key_store).with_verify_after_sign(config.soft_verify),
        ))
    }
}

impl Default for CoreProviderFactory {
    fn default() -> Self {
        Self::new(&Logger::root(slog::Discard, slog::o!()))
    }
}
