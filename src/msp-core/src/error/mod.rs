pub mod certificate;
pub mod config;
pub mod crypto_suite;
pub mod factory;
pub mod fs;
pub mod identity;
pub mod kvstore;
pub mod structured_file;
