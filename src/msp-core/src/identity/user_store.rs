//! Durable repository of enrolled users.
use crate::error::identity::user_store::UserStoreError;
use crate::error::identity::user_store::UserStoreError::{
    EmptyField, InvalidMspId, MissingCertificate, StoreAccessFailed, UserNotFound,
};
use crate::error::kvstore::KeyValueStoreError;
use crate::identity::IdentityIdentifier;
use crate::kvstore::{FileKeyValueStore, KeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;

/// What is persisted per enrolled user. The private key is not part of it:
/// the crypto suite finds it again by the certificate's key identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserData {
    pub id: String,
    pub msp_id: String,

    /// PEM-encoded enrollment certificate.
    pub enrollment_certificate: Vec<u8>,
}

impl UserData {
    pub fn identifier(&self) -> IdentityIdentifier {
        IdentityIdentifier {
            msp_id: self.msp_id.clone(),
            id: self.id.clone(),
        }
    }
}

pub trait UserStore: Send + Sync {
    /// Replaces any previously stored user with the same identifier.
    fn store(&self, user: &UserData) -> Result<(), UserStoreError>;

    fn load(&self, identifier: &IdentityIdentifier) -> Result<UserData, UserStoreError>;

    fn delete(&self, identifier: &IdentityIdentifier) -> Result<(), UserStoreError>;
}

/// Keeps each user's certificate, verbatim, in `<id>@<msp id>-cert.pem`.
#[derive(Clone)]
pub struct CertFileUserStore {
    store: Arc<dyn KeyValueStore>,
}

impl CertFileUserStore {
    /// File-backed store rooted at `path`. The directory is created on the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_store(Arc::new(FileKeyValueStore::new(path)))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

/// User ids may contain '@' (e.g. email addresses), MSP ids may not, so the
/// last '@' of a file name always separates the two.
fn store_key(identifier: &IdentityIdentifier) -> Result<String, UserStoreError> {
    if identifier.msp_id.contains('@') {
        return Err(InvalidMspId(identifier.msp_id.clone()));
    }
    Ok(format!("{}@{}-cert.pem", identifier.id, identifier.msp_id))
}

fn not_found_or_failed(identifier: &IdentityIdentifier, err: KeyValueStoreError) -> UserStoreError {
    match err {
        KeyValueStoreError::NotFound(_) => UserNotFound {
            msp_id: identifier.msp_id.clone(),
            id: identifier.id.clone(),
        },
        err => StoreAccessFailed(err),
    }
}

impl UserStore for CertFileUserStore {
    fn store(&self, user: &UserData) -> Result<(), UserStoreError> {
        if user.id.is_empty() {
            return Err(EmptyField("user id"));
        }
        if user.msp_id.is_empty() {
            return Err(EmptyField("MSP id"));
        }
        if user.enrollment_certificate.is_empty() {
            return Err(MissingCertificate(user.id.clone()));
        }
        self.store
            .store(&store_key(&user.identifier())?, &user.enrollment_certificate)
            .map_err(StoreAccessFailed)
    }

    fn load(&self, identifier: &IdentityIdentifier) -> Result<UserData, UserStoreError> {
        let enrollment_certificate = self
            .store
            .load(&store_key(identifier)?)
            .map_err(|err| not_found_or_failed(identifier, err))?;
        Ok(UserData {
            id: identifier.id.clone(),
            msp_id: identifier.msp_id.clone(),
            enrollment_certificate,
        })
    }

    fn delete(&self, identifier: &IdentityIdentifier) -> Result<(), UserStoreError> {
        self.store
            .delete(&store_key(identifier)?)
            .map_err(|err| not_found_or_failed(identifier, err))
    }
}
