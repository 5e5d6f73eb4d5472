//! Per-organization resolution of signing identities.
//!
//! A user's certificate is looked up, in order, in the credential store
//! (users enrolled through the SDK), among the users embedded in the
//! organization's configuration, and in the organization's MSP directory.
//! The private key is then found by the certificate's subject key identifier:
//! first in the crypto suite, then in the embedded configuration, then in the
//! MSP keystore.
use crate::config::model::network::EmbeddedUser;
use crate::config::EndpointConfig;
use crate::cryptosuite::{
    ski_for_public_key, CryptoSuite, Key, KeyGenOptions, KeyImportOptions,
};
use crate::error::crypto_suite::CryptoSuiteError;
use crate::error::identity::create_signing_identity::CreateSigningIdentityError;
use crate::error::identity::enroll::EnrollError;
use crate::error::identity::get_signing_identity::GetSigningIdentityError;
use crate::error::identity::get_signing_identity::GetSigningIdentityError::{
    GetPrivateKeyFailed, ImportPrivateKeyFailed, InvalidCertificate, LoadUserFailed,
    PrivateKeyNotFound, ReadCertificateFailed, ReadPrivateKeyFailed, UserNotFound,
};
use crate::error::identity::new_identity_manager::NewIdentityManagerError;
use crate::error::identity::new_identity_manager::NewIdentityManagerError::{
    MspIdNotConfigured, NoCryptoPathOrEmbeddedUsers, OrganizationNotConfigured,
};
use crate::error::identity::reenroll::ReenrollError;
use crate::error::identity::user_store::UserStoreError;
use crate::identity::certificate::{parse_certificate, ski_from_certificate};
use crate::identity::enrollment::{EnrollmentRequest, EnrollmentService, ReenrollmentRequest};
use crate::identity::msp_store::MspCryptoStore;
use crate::identity::user_store::{UserData, UserStore};
use crate::identity::{IdentityIdentifier, User};
use slog::{debug, info, trace, warn, Logger};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub struct IdentityManager {
    org_name: String,
    msp_id: String,
    embedded_users: BTreeMap<String, EmbeddedUser>,
    msp_store: Option<MspCryptoStore>,
    user_store: Arc<dyn UserStore>,
    crypto_suite: Arc<dyn CryptoSuite>,
    log: Logger,
}

impl IdentityManager {
    pub fn new(
        log: &Logger,
        org_name: &str,
        user_store: Arc<dyn UserStore>,
        crypto_suite: Arc<dyn CryptoSuite>,
        endpoint_config: &dyn EndpointConfig,
    ) -> Result<Self, NewIdentityManagerError> {
        let org_config = endpoint_config
            .network_config()
            .organization(org_name)
            .ok_or_else(|| OrganizationNotConfigured(org_name.to_string()))?;

        if org_config.msp_id.is_empty() {
            return Err(MspIdNotConfigured(org_name.to_string()));
        }
        if org_config.crypto_path.is_empty() && org_config.users.is_empty() {
            return Err(NoCryptoPathOrEmbeddedUsers(org_name.to_string()));
        }

        let msp_store = if org_config.crypto_path.is_empty() {
            warn!(
                log,
                "Crypto path not provided for organization '{}', MSP stores not created", org_name
            );
            None
        } else {
            let template = resolve_crypto_path(
                &org_config.crypto_path,
                endpoint_config.crypto_config_path(),
            );
            debug!(
                log,
                "Organization '{}' reads provisioned identities from '{}'", org_name, template
            );
            Some(MspCryptoStore::new(template, org_name))
        };

        Ok(Self {
            org_name: org_name.to_string(),
            msp_id: org_config.msp_id.clone(),
            embedded_users: org_config.users.clone(),
            msp_store,
            user_store,
            crypto_suite,
            log: log.clone(),
        })
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    fn identifier(&self, user_name: &str) -> IdentityIdentifier {
        IdentityIdentifier {
            msp_id: self.msp_id.clone(),
            id: user_name.to_string(),
        }
    }

    /// Resolves a signing identity for `user_name` within this organization.
    ///
    /// Fails with [`GetSigningIdentityError::UserNotFound`] when the user was
    /// neither enrolled nor provisioned; the manager stays usable either way.
    pub fn get_signing_identity(&self, user_name: &str) -> Result<User, GetSigningIdentityError> {
        let certificate = match self.user_store.load(&self.identifier(user_name)) {
            Ok(user_data) => {
                trace!(self.log, "Found user '{}' in the user store", user_name);
                user_data.enrollment_certificate
            }
            Err(UserStoreError::UserNotFound { .. }) => self
                .provisioned_certificate(user_name)?
                .ok_or_else(|| UserNotFound(user_name.to_string()))?,
            Err(err) => return Err(LoadUserFailed(user_name.to_string(), err)),
        };

        let private_key = self.private_key_for(user_name, &certificate)?;
        Ok(User::new(
            user_name,
            &self.msp_id,
            certificate,
            private_key,
            self.crypto_suite.clone(),
        ))
    }

    fn embedded_user(&self, user_name: &str) -> Option<&EmbeddedUser> {
        self.embedded_users.get(&user_name.to_lowercase())
    }

    fn provisioned_certificate(
        &self,
        user_name: &str,
    ) -> Result<Option<Vec<u8>>, GetSigningIdentityError> {
        let read_failed = |err| ReadCertificateFailed(user_name.to_string(), err);

        if let Some(user) = self.embedded_user(user_name) {
            if let Some(certificate) = user.cert.load().map_err(read_failed)? {
                trace!(self.log, "Using embedded certificate for '{}'", user_name);
                return Ok(Some(certificate));
            }
        }
        match &self.msp_store {
            Some(msp_store) => msp_store.load_cert(user_name).map_err(read_failed),
            None => Ok(None),
        }
    }

    fn private_key_for(
        &self,
        user_name: &str,
        certificate: &[u8],
    ) -> Result<Key, GetSigningIdentityError> {
        let ski = ski_from_certificate(certificate)
            .map_err(|err| InvalidCertificate(user_name.to_string(), err))?;

        match self.crypto_suite.get_key(&ski) {
            Ok(key) => return Ok(key),
            Err(CryptoSuiteError::KeyNotFound(_)) => {}
            Err(err) => return Err(GetPrivateKeyFailed(user_name.to_string(), err)),
        }

        let read_failed = |err| ReadPrivateKeyFailed(user_name.to_string(), err);
        if let Some(user) = self.embedded_user(user_name) {
            if let Some(pem) = user.key.load().map_err(read_failed)? {
                if let Some(key) = self.import_matching(user_name, &pem, &ski)? {
                    return Ok(key);
                }
            }
        }
        if let Some(msp_store) = &self.msp_store {
            if let Some(pem) = msp_store.load_key(user_name, &ski).map_err(read_failed)? {
                if let Some(key) = self.import_matching(user_name, &pem, &ski)? {
                    return Ok(key);
                }
            }
        }
        Err(PrivateKeyNotFound(user_name.to_string()))
    }

    fn import_matching(
        &self,
        user_name: &str,
        pem: &[u8],
        ski: &[u8],
    ) -> Result<Option<Key>, GetSigningIdentityError> {
        let key = self
            .crypto_suite
            .key_import(pem, &KeyImportOptions { ephemeral: true })
            .map_err(|err| ImportPrivateKeyFailed(user_name.to_string(), err))?;
        if key.ski() == ski {
            Ok(Some(key))
        } else {
            warn!(
                self.log,
                "Private key found for '{}' does not match its certificate", user_name
            );
            Ok(None)
        }
    }

    /// Builds a signing identity from caller-supplied PEM material. The key is
    /// imported into the crypto suite as an ephemeral key.
    pub fn create_signing_identity(
        &self,
        certificate: &[u8],
        private_key: &[u8],
    ) -> Result<User, CreateSigningIdentityError> {
        if certificate.is_empty() {
            return Err(CreateSigningIdentityError::MissingCertificate());
        }
        if private_key.is_empty() {
            return Err(CreateSigningIdentityError::MissingPrivateKey());
        }
        let info =
            parse_certificate(certificate).map_err(CreateSigningIdentityError::InvalidCertificate)?;
        let key = self
            .crypto_suite
            .key_import(private_key, &KeyImportOptions { ephemeral: true })
            .map_err(CreateSigningIdentityError::ImportPrivateKeyFailed)?;
        if key.ski() != ski_for_public_key(&info.public_key).as_slice() {
            return Err(CreateSigningIdentityError::KeyMismatch());
        }
        Ok(User::new(
            info.common_name.as_deref().unwrap_or_default(),
            &self.msp_id,
            certificate.to_vec(),
            key,
            self.crypto_suite.clone(),
        ))
    }

    /// Exchanges `secret` for a certificate over a freshly generated key and
    /// stores the result, replacing any earlier enrollment of the same user.
    /// The key reaches the key store only once the certificate is accepted.
    pub fn enroll(
        &self,
        enrollment_service: &dyn EnrollmentService,
        user_name: &str,
        secret: &str,
    ) -> Result<(), EnrollError> {
        if user_name.is_empty() {
            return Err(EnrollError::EmptyEnrollmentId());
        }
        if secret.is_empty() {
            return Err(EnrollError::EmptySecret());
        }
        debug!(
            self.log,
            "Enrolling '{}' with organization '{}'", user_name, self.org_name
        );

        let key = self
            .crypto_suite
            .key_gen(&ephemeral_key_options())
            .map_err(|err| EnrollError::GenerateKeyFailed(user_name.to_string(), err))?;
        let request = EnrollmentRequest {
            enrollment_id: user_name,
            secret,
            msp_id: &self.msp_id,
            public_key: key.public_key_bytes(),
        };
        let certificate = enrollment_service
            .enroll(&request)
            .map_err(|err| EnrollError::EnrollmentServiceFailed(user_name.to_string(), err))?;

        let ski = ski_from_certificate(&certificate)
            .map_err(|err| EnrollError::InvalidCertificate(user_name.to_string(), err))?;
        if ski != key.ski() {
            return Err(EnrollError::CertificateKeyMismatch(user_name.to_string()));
        }
        self.crypto_suite
            .persist_key(&key)
            .map_err(|err| EnrollError::PersistKeyFailed(user_name.to_string(), err))?;

        self.store_user(user_name, certificate)
            .map_err(|err| EnrollError::StoreUserFailed(user_name.to_string(), err))?;
        info!(
            self.log,
            "Enrolled '{}' with organization '{}'", user_name, self.org_name
        );
        Ok(())
    }

    /// Obtains a certificate for a new key, authenticating with the user's
    /// current identity, and stores it in place of the current one.
    pub fn reenroll(
        &self,
        enrollment_service: &dyn EnrollmentService,
        user_name: &str,
    ) -> Result<(), ReenrollError> {
        let current = self
            .get_signing_identity(user_name)
            .map_err(|err| ReenrollError::GetSigningIdentityFailed(user_name.to_string(), err))?;
        debug!(
            self.log,
            "Re-enrolling '{}' with organization '{}'", user_name, self.org_name
        );

        let key = self
            .crypto_suite
            .key_gen(&ephemeral_key_options())
            .map_err(|err| ReenrollError::GenerateKeyFailed(user_name.to_string(), err))?;
        let signature = current
            .sign(key.public_key_bytes())
            .map_err(|err| ReenrollError::SignRequestFailed(user_name.to_string(), err))?;
        let request = ReenrollmentRequest {
            enrollment_id: user_name,
            msp_id: &self.msp_id,
            current_certificate: current.enrollment_certificate(),
            public_key: key.public_key_bytes(),
            signature: &signature,
        };
        let certificate = enrollment_service
            .reenroll(&request)
            .map_err(|err| ReenrollError::EnrollmentServiceFailed(user_name.to_string(), err))?;

        let ski = ski_from_certificate(&certificate)
            .map_err(|err| ReenrollError::InvalidCertificate(user_name.to_string(), err))?;
        if ski != key.ski() {
            return Err(ReenrollError::CertificateKeyMismatch(user_name.to_string()));
        }
        self.crypto_suite
            .persist_key(&key)
            .map_err(|err| ReenrollError::PersistKeyFailed(user_name.to_string(), err))?;

        self.store_user(user_name, certificate)
            .map_err(|err| ReenrollError::StoreUserFailed(user_name.to_string(), err))?;
        info!(
            self.log,
            "Re-enrolled '{}' with organization '{}'", user_name, self.org_name
        );
        Ok(())
    }

    /// Forgets an enrolled user. Provisioned identities are not affected.
    pub fn remove_user(&self, user_name: &str) -> Result<(), UserStoreError> {
        self.user_store.delete(&self.identifier(user_name))
    }

    fn store_user(&self, user_name: &str, certificate: Vec<u8>) -> Result<(), UserStoreError> {
        self.user_store.store(&UserData {
            id: user_name.to_string(),
            msp_id: self.msp_id.clone(),
            enrollment_certificate: certificate,
        })
    }
}

/// Enrollment keys stay in memory until a certificate for them is accepted,
/// so failed enrollments leave nothing in the key store.
fn ephemeral_key_options() -> KeyGenOptions {
    KeyGenOptions {
        ephemeral: true,
        ..KeyGenOptions::default()
    }
}

fn resolve_crypto_path(crypto_path: &str, crypto_config_root: Option<&Path>) -> String {
    match crypto_config_root {
        Some(root) if Path::new(crypto_path).is_relative() => {
            root.join(crypto_path).to_string_lossy().into_owned()
        }
        _ => crypto_path.to_string(),
    }
}
