//! Entry points that turn configuration into the objects the rest of the SDK
//! signs with.
pub mod core_provider;
pub mod msp_provider;

pub use core_provider::CoreProviderFactory;
pub use msp_provider::ProviderFactory;
