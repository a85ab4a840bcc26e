//! Hook registration and dispatch
//!
//! Handlers are registered as an explicit table built once at startup:
//! pattern string → [`HookHandler`]. For every incoming hook name the
//! dispatcher walks the table and runs each handler whose pattern produces
//! that hook for the relation it fired on.
//!
//! ## Event Flow
//!
//! 1. Hook name arrives (e.g. `ovsdb-relation-changed`)
//! 2. Parse it into relation name and lifecycle event
//! 3. Look up the relation's manager and endpoint binding
//! 4. Run every matching handler in table order, to completion
//!
//! Hooks are handled strictly one at a time. A handler error is returned to
//! the caller of [`HookDispatcher::dispatch`] unchanged.

pub mod event;
pub mod pattern;

pub use event::{HookEvent, LifecycleEvent};
pub use pattern::{EndpointBinding, Endpoints, HookPattern};

use std::collections::BTreeMap;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info};

use crate::config::{EndpointRole, RelationConfig};
use crate::error::{Error, Result};
use crate::requires::{HookHandler, RelationStateManager};

/// Registration table mapping hook patterns to handlers
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    entries: Vec<(HookPattern, HookHandler)>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the [`RelationStateManager`] hook table
    pub fn for_requires() -> Result<Self> {
        let mut registry = Self::new();
        for (pattern, handler) in RelationStateManager::HOOKS {
            registry.register(pattern, *handler)?;
        }
        Ok(registry)
    }

    /// Register a handler for a pattern
    ///
    /// Entries are dispatched in registration order.
    pub fn register(&mut self, pattern: &str, handler: HookHandler) -> Result<()> {
        let pattern = HookPattern::parse(pattern)?;
        debug!("Registered {} -> {}", pattern, handler.name());
        self.entries.push((pattern, handler));
        Ok(())
    }

    /// Registered patterns and their handlers, in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, HookHandler)> {
        self.entries.iter().map(|(p, h)| (p.as_str(), *h))
    }

    /// Patterns registered for `handler`
    pub fn patterns_for(&self, handler: HookHandler) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, h)| *h == handler)
            .map(|(p, _)| p.as_str())
            .collect()
    }

    /// Handlers to run for `hook_name` on the relation described by `binding`
    pub fn handlers_for(&self, hook_name: &str, binding: &EndpointBinding) -> Vec<HookHandler> {
        self.entries
            .iter()
            .filter(|(p, _)| p.matches(hook_name, binding))
            .map(|(_, h)| *h)
            .collect()
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters from [`HookDispatcher::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Hooks received
    pub hooks: usize,
    /// Handlers that completed
    pub handlers_run: usize,
    /// Hooks whose dispatch returned an error
    pub failures: usize,
}

/// Routes hook names to relation managers
#[derive(Debug, Default)]
pub struct HookDispatcher {
    registry: HookRegistry,
    endpoints: Endpoints,
    managers: BTreeMap<String, RelationStateManager>,
}

impl HookDispatcher {
    /// Create a dispatcher with the requires-side hook table
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(HookRegistry::for_requires()?))
    }

    /// Create a dispatcher with a custom registry
    pub fn with_registry(registry: HookRegistry) -> Self {
        Self {
            registry,
            endpoints: Endpoints::new(),
            managers: BTreeMap::new(),
        }
    }

    /// Add a manager, binding its relation to `role` and `interface`
    pub fn add_manager(
        &mut self,
        manager: RelationStateManager,
        role: EndpointRole,
        interface: impl Into<String>,
    ) -> Result<()> {
        let relation_name = manager.relation().name().to_string();
        self.endpoints.bind(relation_name.clone(), role, interface)?;
        info!("Managing relation {}", relation_name);
        self.managers.insert(relation_name, manager);
        Ok(())
    }

    /// Add a manager using the role and interface from its configuration
    pub fn add_configured(
        &mut self,
        config: &RelationConfig,
        manager: RelationStateManager,
    ) -> Result<()> {
        if manager.relation().name() != config.relation_name {
            return Err(Error::config(format!(
                "Manager for '{}' does not match configured relation '{}'",
                manager.relation().name(),
                config.relation_name
            )));
        }
        self.add_manager(manager, config.role, config.interface.clone())
    }

    /// The registration table
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Endpoint bindings
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Manager for a relation
    pub fn manager(&self, relation_name: &str) -> Option<&RelationStateManager> {
        self.managers.get(relation_name)
    }

    /// Dispatch one hook and return how many handlers ran
    ///
    /// Hooks that are not relation hooks, or that name a relation without a
    /// manager, run nothing and return `Ok(0)`.
    pub async fn dispatch(&self, hook_name: &str) -> Result<usize> {
        let Some(event) = HookEvent::parse(hook_name) else {
            debug!("Ignoring non-relation hook {}", hook_name);
            return Ok(0);
        };

        let (Some(manager), Some(binding)) = (
            self.managers.get(&event.relation_name),
            self.endpoints.lookup(&event.relation_name),
        ) else {
            debug!("No manager for relation {}, ignoring {}", event.relation_name, hook_name);
            return Ok(0);
        };

        let handlers = self.registry.handlers_for(hook_name, binding);
        for handler in &handlers {
            info!("Dispatching {} to {}", hook_name, handler.name());
            manager.handle(*handler).await?;
        }

        Ok(handlers.len())
    }

    /// Dispatch hooks from a stream until it ends
    ///
    /// Each hook is handled to completion before the next is read. Failures
    /// are logged and counted; processing continues with the next hook.
    pub async fn run<S>(&self, hooks: S) -> DispatchSummary
    where
        S: Stream<Item = String>,
    {
        let mut summary = DispatchSummary::default();
        tokio::pin!(hooks);

        while let Some(hook_name) = hooks.next().await {
            summary.hooks += 1;
            match self.dispatch(&hook_name).await {
                Ok(count) => summary.handlers_run += count,
                Err(e) => {
                    error!("Failed to handle {}: {}", hook_name, e);
                    summary.failures += 1;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticRelationData;
    use crate::requires::Relation;
    use crate::state::MemoryStateStore;
    use crate::traits::StateStore;
    use std::sync::Arc;

    fn dispatcher(store: &MemoryStateStore) -> HookDispatcher {
        let mut dispatcher = HookDispatcher::new().unwrap();
        let manager = RelationStateManager::new(
            Relation::new("ovsdb", Vec::new()),
            Arc::new(StaticRelationData::new("10.0.0.20").with_protocol("tcp")),
            Arc::new(store.clone()),
        );
        dispatcher
            .add_manager(manager, EndpointRole::Requires, "ovsdb-manager")
            .unwrap();
        dispatcher
    }

    #[test]
    fn test_registry_for_requires() {
        let registry = HookRegistry::for_requires().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.patterns_for(HookHandler::Changed),
            vec!["{requires:ovsdb-manager}-relation-{joined,changed,departed}"]
        );
        assert_eq!(
            registry.patterns_for(HookHandler::Broken),
            vec!["{requires:ovsdb-manager}-relation-broken"]
        );
    }

    #[test]
    fn test_registry_rejects_bad_pattern() {
        let mut registry = HookRegistry::new();
        assert!(registry.register("{requires:x", HookHandler::Changed).is_err());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_changed_and_broken() {
        let store = MemoryStateStore::new();
        let dispatcher = dispatcher(&store);

        assert_eq!(dispatcher.dispatch("ovsdb-relation-joined").await.unwrap(), 1);
        assert!(store.is_state("ovsdb.access.available").await.unwrap());

        assert_eq!(dispatcher.dispatch("ovsdb-relation-broken").await.unwrap(), 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_dispatch_ignores_unknown_hooks() {
        let store = MemoryStateStore::new();
        let dispatcher = dispatcher(&store);

        assert_eq!(dispatcher.dispatch("config-changed").await.unwrap(), 0);
        assert_eq!(dispatcher.dispatch("other-relation-changed").await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_manager_rejected() {
        let store = MemoryStateStore::new();
        let mut dispatcher = dispatcher(&store);
        let manager = RelationStateManager::new(
            Relation::new("ovsdb", Vec::new()),
            Arc::new(StaticRelationData::new("10.0.0.21")),
            Arc::new(store.clone()),
        );
        assert!(
            dispatcher
                .add_manager(manager, EndpointRole::Requires, "ovsdb-manager")
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_add_configured_checks_name() {
        let store = MemoryStateStore::new();
        let mut dispatcher = HookDispatcher::new().unwrap();
        let manager = RelationStateManager::new(
            Relation::new("ovsdb", Vec::new()),
            Arc::new(StaticRelationData::new("10.0.0.20")),
            Arc::new(store),
        );
        let config = RelationConfig::new("other");
        assert!(dispatcher.add_configured(&config, manager).is_err());
    }

    #[tokio::test]
    async fn test_run_consumes_stream_in_order() {
        let store = MemoryStateStore::new();
        let dispatcher = dispatcher(&store);

        let hooks = tokio_stream::iter(vec![
            "ovsdb-relation-joined".to_string(),
            "ovsdb-relation-changed".to_string(),
            "install".to_string(),
            "ovsdb-relation-broken".to_string(),
        ]);
        let summary = dispatcher.run(hooks).await;

        assert_eq!(
            summary,
            DispatchSummary {
                hooks: 4,
                handlers_run: 3,
                failures: 0
            }
        );
        assert!(store.is_empty().await);
    }
}
