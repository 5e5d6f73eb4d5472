//! Identity and credential resolution for clients of a permissioned ledger
//! network made of independent organizations.
//!
//! The entry points are [`factory::ProviderFactory`], which builds the
//! credential store and the per-organization identity managers, and
//! [`factory::CoreProviderFactory`], which builds the crypto suite they share.
pub mod config;
pub mod cryptosuite;
pub mod error;
pub mod factory;
pub mod fs;
pub mod identity;
pub mod json;
pub mod kvstore;
