//! Configuration types for the relation crate
//!
//! A [`RelationConfig`] describes one requires-side relation endpoint: its
//! name, the interface it speaks, and where its flags are kept.

use serde::{Deserialize, Serialize};

/// Interface name this crate implements
pub const DEFAULT_INTERFACE: &str = "ovsdb-manager";

/// Relation name used when the consuming service does not name one
pub const DEFAULT_RELATION_NAME: &str = "ovsdb-manager";

/// Configuration for a single relation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationConfig {
    /// Relation name as declared by the consuming service (e.g. "ovsdb")
    pub relation_name: String,

    /// Interface spoken over the relation
    #[serde(default = "default_interface")]
    pub interface: String,

    /// Role this side plays on the relation
    #[serde(default)]
    pub role: EndpointRole,

    /// Flag templates owned by this relation, in declaration order
    #[serde(default)]
    pub default_states: Vec<String>,

    /// Flag store configuration
    #[serde(default)]
    pub state_store: StateStoreConfig,
}

impl RelationConfig {
    /// Create a requires-side configuration with defaults
    pub fn new(relation_name: impl Into<String>) -> Self {
        Self {
            relation_name: relation_name.into(),
            interface: default_interface(),
            role: EndpointRole::default(),
            default_states: Vec::new(),
            state_store: StateStoreConfig::default(),
        }
    }

    /// Set the flag store
    pub fn with_state_store(mut self, state_store: StateStoreConfig) -> Self {
        self.state_store = state_store;
        self
    }

    /// Set the default flag templates
    pub fn with_default_states(mut self, default_states: Vec<String>) -> Self {
        self.default_states = default_states;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_relation_name(&self.relation_name)?;

        if self.interface.is_empty() {
            return Err(crate::Error::config("Interface name cannot be empty"));
        }

        if self.default_states.iter().any(|s| s.is_empty()) {
            return Err(crate::Error::config("Default state names cannot be empty"));
        }

        self.state_store.validate()
    }
}

/// Role of an endpoint on a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    /// Consumes data published by the other side
    #[default]
    Requires,
    /// Publishes data for the other side
    Provides,
}

impl EndpointRole {
    /// Name used in hook pattern placeholders
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointRole::Requires => "requires",
            EndpointRole::Provides => "provides",
        }
    }
}

impl std::str::FromStr for EndpointRole {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requires" => Ok(EndpointRole::Requires),
            "provides" => Ok(EndpointRole::Provides),
            other => Err(crate::Error::config(format!(
                "Unknown endpoint role '{}'",
                other
            ))),
        }
    }
}

/// Flag store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateStoreConfig {
    /// JSON file that persists between hook invocations
    File {
        /// Path to the state file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,
}

impl StateStoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StateStoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("State store path cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

/// Validate a relation name
///
/// Names are lowercase alphanumerics separated by single hyphens, starting
/// with a letter.
pub fn validate_relation_name(name: &str) -> Result<(), crate::Error> {
    if name.is_empty() {
        return Err(crate::Error::config("Relation name cannot be empty"));
    }

    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(crate::Error::config(format!(
            "Relation name must start with a lowercase letter: '{}'",
            name
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(crate::Error::config(format!(
            "Relation name contains invalid characters: '{}'. \
            Valid: lowercase letters, digits and hyphen.",
            name
        )));
    }

    if name.ends_with('-') || name.contains("--") {
        return Err(crate::Error::config(format!(
            "Relation name has an empty segment: '{}'",
            name
        )));
    }

    Ok(())
}

fn default_interface() -> String {
    DEFAULT_INTERFACE.to_string()
}
