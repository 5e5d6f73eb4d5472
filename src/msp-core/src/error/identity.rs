pub mod create_signing_identity;
pub mod enroll;
pub mod enrollment_service;
pub mod get_signing_identity;
pub mod new_identity_manager;
pub mod reenroll;
pub mod user_store;
