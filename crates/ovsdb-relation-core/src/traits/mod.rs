//! Collaborator traits for the relation manager
//!
//! - [`RelationData`]: Read values published on the relation
//! - [`StateStore`]: Idempotent set of named flags

pub mod relation_data;
pub mod state_store;

pub use relation_data::RelationData;
pub use state_store::StateStore;
