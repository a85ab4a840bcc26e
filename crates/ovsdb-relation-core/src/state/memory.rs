// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Holds flags for the lifetime of the process only. Useful for tests and
// for embedding the manager in a long-running service that re-derives its
// flags on startup.

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::traits::StateStore;
use crate::Error;

/// In-memory flag store
///
/// Flags live in a `BTreeSet` behind a `RwLock`, so listing is ordered.
/// Clones share the same underlying set.
///
/// # Example
///
/// ```rust,no_run
/// use ovsdb_relation_core::state::MemoryStateStore;
/// use ovsdb_relation_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStateStore::new();
///
///     store.set_state("ovsdb.connected").await?;
///     assert!(store.is_state("ovsdb.connected").await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<BTreeSet<String>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flags currently set
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if no flags are set
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Remove every flag
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn set_state(&self, name: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        if guard.insert(name.to_string()) {
            tracing::trace!("Flag set: {}", name);
        }
        Ok(())
    }

    async fn remove_state(&self, name: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        if guard.remove(name) {
            tracing::trace!("Flag removed: {}", name);
        }
        Ok(())
    }

    async fn is_state(&self, name: &str) -> Result<bool, Error> {
        Ok(self.inner.read().await.contains(name))
    }

    async fn list_states(&self) -> Result<Vec<String>, Error> {
        Ok(self.inner.read().await.iter().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStateStore::new();
        assert!(store.is_empty().await);

        store.set_state("ovsdb.connected").await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.is_state("ovsdb.connected").await.unwrap());

        store.remove_state("ovsdb.connected").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_idempotent() {
        let store = MemoryStateStore::new();

        store.set_state("ovsdb.connected").await.unwrap();
        store.set_state("ovsdb.connected").await.unwrap();
        assert_eq!(store.len().await, 1);

        store.remove_state("ovsdb.access.available").await.unwrap();
        store.remove_state("ovsdb.connected").await.unwrap();
        store.remove_state("ovsdb.connected").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_list_sorted_and_shared() {
        let store = MemoryStateStore::new();
        let shared = store.clone();

        store.set_state("b.connected").await.unwrap();
        store.set_state("a.connected").await.unwrap();

        assert_eq!(
            shared.list_states().await.unwrap(),
            vec!["a.connected".to_string(), "b.connected".to_string()]
        );

        shared.clear().await;
        assert!(store.is_empty().await);
    }
}
