//! In-process implementations of the storage traits. Nothing here survives a
//! restart.

pub mod cat_store;
pub mod demo_data;
pub mod identity_provider;

pub use cat_store::InMemoryCatStore;
pub use identity_provider::InMemoryIdentityProvider;
