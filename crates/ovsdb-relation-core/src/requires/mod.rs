//! Requires-side relation state manager
//!
//! The [`RelationStateManager`] turns relation lifecycle events into flags:
//!
//! ```text
//!            changed()                    changed()
//! absent ───────────────► connected ◄──────────────► connected +
//!   ▲                        │                      access.available
//!   │        broken()        │                             │
//!   └────────────────────────┴─────────────────────────────┘
//! ```
//!
//! - `{relation_name}.connected` is set by every joined/changed/departed hook.
//! - `{relation_name}.access.available` is set while a connection string can
//!   be derived from the remote unit's data and removed otherwise.
//! - A broken hook removes both flags without reading relation data.
//!
//! The states are not held in an enum. They are whatever the flag store
//! says after the last handler ran; [`RelationStatus`] only reports them.

pub mod connection;

pub use connection::{ConnectionString, DEFAULT_PORT};

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::RelationConfig;
use crate::data::non_empty;
use crate::error::Result;
use crate::traits::{RelationData, StateStore};

/// Placeholder replaced by the relation name in flag templates
pub const RELATION_NAME_PLACEHOLDER: &str = "{relation_name}";

/// Flag set while the relation exists
pub const CONNECTED_STATE: &str = "{relation_name}.connected";

/// Flag set while a connection string is resolvable
pub const ACCESS_AVAILABLE_STATE: &str = "{relation_name}.access.available";

/// Hook pattern bound to [`HookHandler::Changed`]
pub const CHANGED_HOOK_PATTERN: &str =
    "{requires:ovsdb-manager}-relation-{joined,changed,departed}";

/// Hook pattern bound to [`HookHandler::Broken`]
pub const BROKEN_HOOK_PATTERN: &str = "{requires:ovsdb-manager}-relation-broken";

/// Handler entry points of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookHandler {
    /// [`RelationStateManager::changed`]
    Changed,
    /// [`RelationStateManager::broken`]
    Broken,
}

impl HookHandler {
    /// Handler name as it appears in logs
    pub fn name(&self) -> &'static str {
        match self {
            HookHandler::Changed => "changed",
            HookHandler::Broken => "broken",
        }
    }
}

/// Observed state of a relation, derived from its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationStatus {
    /// No flags set
    Absent,
    /// Connected, but the remote unit has not published a usable connection
    ConnectedNoAccess,
    /// Connected with a resolvable connection string
    ConnectedWithAccess,
}

impl std::fmt::Display for RelationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::ConnectedNoAccess => write!(f, "connected-no-access"),
            Self::ConnectedWithAccess => write!(f, "connected-with-access"),
        }
    }
}

/// One instance of a named relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    name: String,
    default_states: Vec<String>,
}

impl Relation {
    /// Create a relation with the given default flag templates
    pub fn new(name: impl Into<String>, default_states: Vec<String>) -> Self {
        Self {
            name: name.into(),
            default_states,
        }
    }

    /// Create a relation from validated configuration
    pub fn from_config(config: &RelationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.relation_name.clone(),
            config.default_states.clone(),
        ))
    }

    /// Relation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default flag templates, in declaration order
    pub fn default_states(&self) -> &[String] {
        &self.default_states
    }

    /// Expand `{relation_name}` in a flag template
    pub fn scoped_state(&self, template: &str) -> String {
        template.replace(RELATION_NAME_PLACEHOLDER, &self.name)
    }

    /// Every flag this relation is responsible for, scoped
    ///
    /// The manager's own flags come first, followed by the default states.
    pub fn managed_states(&self) -> Vec<String> {
        [CONNECTED_STATE, ACCESS_AVAILABLE_STATE]
            .into_iter()
            .chain(self.default_states.iter().map(String::as_str))
            .map(|template| self.scoped_state(template))
            .collect()
    }
}

/// Derives flags for one requires-side relation
///
/// ## Collaborators
///
/// - [`RelationData`]: read on `changed()` and `connection_string()` only
/// - [`StateStore`]: shared, idempotent flag store
///
/// Collaborator errors propagate unchanged; the manager has no retry logic.
pub struct RelationStateManager {
    relation: Relation,
    data: Arc<dyn RelationData>,
    store: Arc<dyn StateStore>,
}

impl RelationStateManager {
    /// Hook registration table, in dispatch order
    pub const HOOKS: &'static [(&'static str, HookHandler)] = &[
        (CHANGED_HOOK_PATTERN, HookHandler::Changed),
        (BROKEN_HOOK_PATTERN, HookHandler::Broken),
    ];

    /// Create a manager for `relation`
    pub fn new(
        relation: Relation,
        data: Arc<dyn RelationData>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            relation,
            data,
            store,
        }
    }

    /// The relation this manager owns
    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    /// Resolve the connection published by the remote unit
    ///
    /// An empty published value counts as absent.
    ///
    /// - No protocol: `None`
    /// - No host: the relation's private address is used instead
    /// - No port: [`DEFAULT_PORT`]
    pub async fn connection(&self) -> Result<Option<ConnectionString>> {
        let host = non_empty(self.data.host().await?);
        let port = non_empty(self.data.port().await?);
        let Some(protocol) = non_empty(self.data.protocol().await?) else {
            return Ok(None);
        };

        let host = match host {
            Some(host) => host,
            None => self.data.private_address().await?,
        };

        Ok(Some(ConnectionString::new(protocol, host, port)))
    }

    /// [`connection`](Self::connection) formatted as `protocol:host:port`
    pub async fn connection_string(&self) -> Result<Option<String>> {
        Ok(self.connection().await?.map(|conn| conn.to_string()))
    }

    /// Handle a joined, changed or departed hook
    pub async fn changed(&self) -> Result<()> {
        let connected = self.relation.scoped_state(CONNECTED_STATE);
        let available = self.relation.scoped_state(ACCESS_AVAILABLE_STATE);

        self.store.set_state(&connected).await?;

        match self.connection_string().await? {
            Some(conn) => {
                debug!("Relation {} resolved connection {}", self.relation.name, conn);
                self.store.set_state(&available).await?;
            }
            None => {
                debug!(
                    "Relation {} has no protocol published, access unavailable",
                    self.relation.name
                );
                self.store.remove_state(&available).await?;
            }
        }

        Ok(())
    }

    /// Handle a broken hook
    pub async fn broken(&self) -> Result<()> {
        info!("Relation {} broken, clearing flags", self.relation.name);

        self.store
            .remove_state(&self.relation.scoped_state(CONNECTED_STATE))
            .await?;
        self.store
            .remove_state(&self.relation.scoped_state(ACCESS_AVAILABLE_STATE))
            .await?;

        Ok(())
    }

    /// Run the handler named by `handler`
    pub async fn handle(&self, handler: HookHandler) -> Result<()> {
        match handler {
            HookHandler::Changed => self.changed().await,
            HookHandler::Broken => self.broken().await,
        }
    }

    /// Report the relation's state from the flag store
    pub async fn status(&self) -> Result<RelationStatus> {
        let connected = self
            .store
            .is_state(&self.relation.scoped_state(CONNECTED_STATE))
            .await?;
        let available = self
            .store
            .is_state(&self.relation.scoped_state(ACCESS_AVAILABLE_STATE))
            .await?;

        Ok(match (connected, available) {
            (false, _) => RelationStatus::Absent,
            (true, false) => RelationStatus::ConnectedNoAccess,
            (true, true) => RelationStatus::ConnectedWithAccess,
        })
    }

    /// Managed flags that are currently set, in [`Relation::managed_states`] order
    pub async fn active_states(&self) -> Result<Vec<String>> {
        let mut active = Vec::new();
        for state in self.relation.managed_states() {
            if self.store.is_state(&state).await? {
                active.push(state);
            }
        }
        Ok(active)
    }
}

impl std::fmt::Debug for RelationStateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationStateManager")
            .field("relation", &self.relation)
            .finish_non_exhaustive()
    }
}
