// # Relation Data Trait
//
// Defines the read surface over data published on a relation.
//
// ## Lookups
//
// - `host`, `port`, `protocol`: published by the remote (provides) unit.
//   Any of them may be missing while the remote side is still configuring.
// - `private_address`: intrinsic to the relation itself, so it is answerable
//   as soon as the relation exists.
//
// The trait intentionally has no "get any key" method. The manager only
// needs these four values.

use async_trait::async_trait;

/// Trait for relation data implementations
///
/// # Failure Semantics
///
/// A value that has not been published is `Ok(None)`. `Err` is reserved for
/// transport failures, which the manager propagates without recovery.
///
/// An empty published string is treated as absent by the manager.
#[async_trait]
pub trait RelationData: Send + Sync {
    /// Host published by the remote unit
    async fn host(&self) -> Result<Option<String>, crate::Error>;

    /// Port published by the remote unit
    async fn port(&self) -> Result<Option<String>, crate::Error>;

    /// Protocol published by the remote unit (e.g. `tcp`, `ssl`)
    async fn protocol(&self) -> Result<Option<String>, crate::Error>;

    /// Private address of the relation
    async fn private_address(&self) -> Result<String, crate::Error>;
}
