// # ovsdb-relation-core
//
// Requires-side state derivation for the `ovsdb-manager` relation.
//
// ## Architecture Overview
//
// - **RelationData**: Trait for reading values published on the relation
// - **StateStore**: Trait for the idempotent flag store
// - **RelationStateManager**: Turns lifecycle hooks into flags and composes
//   the `protocol:host:port` connection string
// - **HookDispatcher**: Routes hook names to managers through an explicit
//   pattern → handler table
//
// ## Flags
//
// - `{relation_name}.connected`: the relation exists
// - `{relation_name}.access.available`: a connection string is resolvable
//
// ## Design Principles
//
// 1. **Injected collaborators**: data and flags come in through traits
// 2. **Absence is data**: unpublished values are `None`, never errors
// 3. **Idempotency**: handlers can be replayed without changing the outcome
// 4. **Library-first**: the `ovsdb-hook` binary is a thin wrapper

pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod requires;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{EndpointRole, RelationConfig, StateStoreConfig};
pub use data::{FileRelationData, StaticRelationData};
pub use dispatch::{HookDispatcher, HookEvent, HookPattern, HookRegistry, LifecycleEvent};
pub use error::{Error, Result};
pub use requires::{ConnectionString, HookHandler, Relation, RelationStateManager, RelationStatus};
pub use state::{FileStateStore, MemoryStateStore, create_state_store};
pub use traits::{RelationData, StateStore};
