//! Service layer for the gift registry.
//! - Persistence store behind the `RegistryRepository` trait.
//! - Snapshot loading, reservation rules and item management on top of it.
//! - Uploaded images kept on disk through `ImageStore`.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod registry;
