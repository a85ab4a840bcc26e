//! Test doubles shared by the contract tests
//!
//! The doubles record every call they receive so tests can assert on the
//! exact sequence of store writes and relation data reads.

#![allow(dead_code)]

use ovsdb_relation_core::error::{Error, Result};
use ovsdb_relation_core::traits::{RelationData, StateStore};
use ovsdb_relation_core::{Relation, RelationStateManager};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// One interaction with a [`RecordingStateStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Set(String),
    Remove(String),
    Is(String),
    List,
    Flush,
}

pub fn set(name: &str) -> StoreCall {
    StoreCall::Set(name.to_string())
}

pub fn remove(name: &str) -> StoreCall {
    StoreCall::Remove(name.to_string())
}

/// A flag store that records calls and keeps real set semantics
#[derive(Debug, Clone, Default)]
pub struct RecordingStateStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    flags: Arc<Mutex<BTreeSet<String>>>,
}

impl RecordingStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only set/remove calls, in order
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::Set(_) | StoreCall::Remove(_)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Current flags without recording a call
    pub fn flags(&self) -> Vec<String> {
        self.flags.lock().unwrap().iter().cloned().collect()
    }

    /// Pre-set a flag without recording a call
    pub fn seed(&self, name: &str) {
        self.flags.lock().unwrap().insert(name.to_string());
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl StateStore for RecordingStateStore {
    async fn set_state(&self, name: &str) -> Result<()> {
        self.record(StoreCall::Set(name.to_string()));
        self.flags.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    async fn remove_state(&self, name: &str) -> Result<()> {
        self.record(StoreCall::Remove(name.to_string()));
        self.flags.lock().unwrap().remove(name);
        Ok(())
    }

    async fn is_state(&self, name: &str) -> Result<bool> {
        self.record(StoreCall::Is(name.to_string()));
        Ok(self.flags.lock().unwrap().contains(name))
    }

    async fn list_states(&self) -> Result<Vec<String>> {
        self.record(StoreCall::List);
        Ok(self.flags())
    }

    async fn flush(&self) -> Result<()> {
        self.record(StoreCall::Flush);
        Ok(())
    }
}

/// Relation data whose values can be changed between hooks and whose
/// reads are recorded
#[derive(Debug, Clone, Default)]
pub struct ScriptedRelationData {
    values: Arc<Mutex<Published>>,
    reads: Arc<Mutex<Vec<&'static str>>>,
}

#[derive(Debug, Clone, Default)]
struct Published {
    host: Option<String>,
    port: Option<String>,
    protocol: Option<String>,
    private_address: Option<String>,
    failing: bool,
}

impl ScriptedRelationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        host: Option<&str>,
        port: Option<&str>,
        protocol: Option<&str>,
        private_address: &str,
    ) -> Self {
        let data = Self::new();
        data.publish(host, port, protocol);
        data.values.lock().unwrap().private_address = Some(private_address.to_string());
        data
    }

    /// Replace the remote unit's settings
    pub fn publish(&self, host: Option<&str>, port: Option<&str>, protocol: Option<&str>) {
        let mut values = self.values.lock().unwrap();
        values.host = host.map(str::to_string);
        values.port = port.map(str::to_string);
        values.protocol = protocol.map(str::to_string);
    }

    /// Make every lookup fail as if the transport were gone
    pub fn fail(&self) {
        self.values.lock().unwrap().failing = true;
    }

    /// Names of the lookups performed, in order
    pub fn reads(&self) -> Vec<&'static str> {
        self.reads.lock().unwrap().clone()
    }

    fn read(&self, key: &'static str) -> Result<Published> {
        self.reads.lock().unwrap().push(key);
        let values = self.values.lock().unwrap().clone();
        if values.failing {
            return Err(Error::relation_data("remote unit is gone"));
        }
        Ok(values)
    }
}

#[async_trait::async_trait]
impl RelationData for ScriptedRelationData {
    async fn host(&self) -> Result<Option<String>> {
        Ok(self.read("host")?.host)
    }

    async fn port(&self) -> Result<Option<String>> {
        Ok(self.read("port")?.port)
    }

    async fn protocol(&self) -> Result<Option<String>> {
        Ok(self.read("protocol")?.protocol)
    }

    async fn private_address(&self) -> Result<String> {
        self.read("private_address")?
            .private_address
            .ok_or_else(|| Error::relation_data("no private address"))
    }
}

/// Build a manager over the given doubles
pub fn manager(
    relation_name: &str,
    data: &ScriptedRelationData,
    store: &RecordingStateStore,
) -> RelationStateManager {
    RelationStateManager::new(
        Relation::new(relation_name, Vec::new()),
        Arc::new(data.clone()),
        Arc::new(store.clone()),
    )
}
