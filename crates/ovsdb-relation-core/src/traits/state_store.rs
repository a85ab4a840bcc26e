// # State Store Trait
//
// Defines the interface for the flag store that downstream automation reads.
//
// ## Purpose
//
// The store is a set of named boolean flags such as `ovsdb.connected`.
// A flag is either present or absent; there are no values attached.
//
// ## Idempotency
//
// Setting a flag that is already set, or removing one that is already
// absent, is a no-op. The relation manager relies on this and never reads a
// flag before writing it.
//
// ## Usage
//
// ```rust
// use ovsdb_relation_core::{MemoryStateStore, StateStore};
//
// #[tokio::main]
// async fn main() -> ovsdb_relation_core::Result<()> {
//     let store = MemoryStateStore::new();
//
//     store.set_state("ovsdb.connected").await?;
//     assert!(store.is_state("ovsdb.connected").await?);
//
//     store.remove_state("ovsdb.connected").await?;
//     store.remove_state("ovsdb.connected").await?;
//     assert!(!store.is_state("ovsdb.connected").await?);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for flag store implementations
///
/// Implementations must be thread-safe so a single store can be shared by
/// every relation manager in the process through an `Arc`.
///
/// # Trust Level: Trusted (Core Component)
///
/// ## Allowed Capabilities
/// - ✅ Perform I/O for persistence (files, databases)
/// - ✅ Cache flags in memory (with explicit flush)
///
/// ## Forbidden Capabilities
/// - ❌ Decide which flags to set (owned by `RelationStateManager`)
/// - ❌ Read relation data (owned by `RelationData`)
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Set a flag
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The flag is set (whether or not it was before)
    /// - `Err(Error)`: Storage error
    async fn set_state(&self, name: &str) -> Result<(), crate::Error>;

    /// Remove a flag
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The flag is absent (whether or not it was before)
    /// - `Err(Error)`: Storage error
    async fn remove_state(&self, name: &str) -> Result<(), crate::Error>;

    /// Check whether a flag is set
    async fn is_state(&self, name: &str) -> Result<bool, crate::Error>;

    /// List all set flags in lexical order
    async fn list_states(&self) -> Result<Vec<String>, crate::Error>;

    /// Persist any pending changes
    ///
    /// Stores that write through on every change can treat this as a no-op.
    async fn flush(&self) -> Result<(), crate::Error>;
}
