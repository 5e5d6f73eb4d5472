use crate::error::kvstore::KeyValueStoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("User '{id}' of MSP '{msp_id}' not found in the user store")]
    UserNotFound { msp_id: String, id: String },

    #[error("Cannot store a user with an empty {0}")]
    EmptyField(&'static str),

    #[error("MSP id '{0}' must not contain '@'")]
    InvalidMspId(String),

    #[error("Cannot store user '{0}' without an enrollment certificate")]
    MissingCertificate(String),

    #[error("User store access failed")]
    StoreAccessFailed(#[source] KeyValueStoreError),
}
