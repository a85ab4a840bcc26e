// # State Store Implementations
//
// Implementations of the StateStore trait for different persistence
// strategies, plus construction from configuration.

pub mod file;
pub mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;

use crate::config::StateStoreConfig;
use crate::error::Result;
use crate::traits::StateStore;

/// Create a flag store from configuration
pub async fn create_state_store(config: &StateStoreConfig) -> Result<Box<dyn StateStore>> {
    config.validate()?;

    match config {
        StateStoreConfig::File { path } => {
            tracing::debug!("Using file state store at {}", path);
            Ok(Box::new(FileStateStore::new(path).await?))
        }
        StateStoreConfig::Memory => {
            tracing::debug!("Using memory state store");
            Ok(Box::new(MemoryStateStore::new()))
        }
    }
}
