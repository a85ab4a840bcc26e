// # ovsdb-hook - relation hook entry point
//
// Thin integration layer. All flag and connection logic lives in
// ovsdb-relation-core; this binary only wires collaborators together for a
// single hook invocation and exits.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `OVSDB_HOOK_NAME`: Hook being run (or pass it as the first argument)
// - `OVSDB_RELATION_NAME`: Relation name (default: ovsdb-manager)
// - `OVSDB_RELATION_DATA`: Path to the relation data JSON snapshot
// - `OVSDB_STATE_STORE_TYPE`: Flag store type (file, memory; default: file)
// - `OVSDB_STATE_STORE_PATH`: Path to the flag file (for file store)
// - `OVSDB_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export OVSDB_RELATION_NAME=ovsdb
// export OVSDB_RELATION_DATA=/run/ovsdb-relation/relation.json
// export OVSDB_STATE_STORE_PATH=/var/lib/ovsdb-relation/flags.json
//
// ovsdb-hook ovsdb-relation-changed
// ```

use anyhow::Result;
use ovsdb_relation_core::{
    FileRelationData, HookDispatcher, Relation, RelationConfig, RelationStateManager,
    StateStoreConfig,
};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum HookExitCode {
    /// Hook handled (or ignored) cleanly
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// A handler or collaborator failed
    RuntimeError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    hook_name: String,
    relation_name: String,
    relation_data_path: Option<String>,
    state_store_type: String,
    state_store_path: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables and arguments
    fn from_env() -> Result<Self> {
        let hook_name = env::args()
            .nth(1)
            .or_else(|| env::var("OVSDB_HOOK_NAME").ok())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No hook name given. Pass it as the first argument or set OVSDB_HOOK_NAME"
                )
            })?;

        Ok(Self {
            hook_name,
            relation_name: env::var("OVSDB_RELATION_NAME")
                .unwrap_or_else(|_| ovsdb_relation_core::config::DEFAULT_RELATION_NAME.to_string()),
            relation_data_path: env::var("OVSDB_RELATION_DATA").ok(),
            state_store_type: env::var("OVSDB_STATE_STORE_TYPE")
                .unwrap_or_else(|_| "file".to_string()),
            state_store_path: env::var("OVSDB_STATE_STORE_PATH").ok(),
            log_level: env::var("OVSDB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.hook_name.is_empty() {
            anyhow::bail!("Hook name cannot be empty");
        }

        if self.relation_data_path.as_ref().is_none_or(|p| p.is_empty()) {
            anyhow::bail!(
                "OVSDB_RELATION_DATA is required. \
                Set it via: export OVSDB_RELATION_DATA=/run/ovsdb-relation/relation.json"
            );
        }

        match self.state_store_type.as_str() {
            "file" => {
                if self.state_store_path.as_ref().is_none_or(|p| p.is_empty()) {
                    anyhow::bail!(
                        "OVSDB_STATE_STORE_PATH is required when OVSDB_STATE_STORE_TYPE=file. \
                        Set it via: export OVSDB_STATE_STORE_PATH=/var/lib/ovsdb-relation/flags.json"
                    );
                }
            }
            "memory" => {}
            _ => anyhow::bail!(
                "OVSDB_STATE_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                self.state_store_type
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "OVSDB_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.relation_config().validate()?;
        Ok(())
    }

    /// Relation configuration for the core library
    fn relation_config(&self) -> RelationConfig {
        let state_store = match (self.state_store_type.as_str(), &self.state_store_path) {
            ("file", Some(path)) => StateStoreConfig::File { path: path.clone() },
            _ => StateStoreConfig::Memory,
        };
        RelationConfig::new(self.relation_name.clone()).with_state_store(state_store)
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    // Hooks are handled one at a time; a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_hook(&config).await {
            Ok(()) => HookExitCode::Success,
            Err(e) => {
                error!("Hook {} failed: {}", config.hook_name, e);
                HookExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Run a single hook invocation
async fn run_hook(config: &Config) -> Result<()> {
    let relation_config = config.relation_config();
    let relation_data_path = config
        .relation_data_path
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("OVSDB_RELATION_DATA is required"))?;

    let store: Arc<dyn ovsdb_relation_core::StateStore> =
        Arc::from(ovsdb_relation_core::create_state_store(&relation_config.state_store).await?);

    let manager = RelationStateManager::new(
        Relation::from_config(&relation_config)?,
        Arc::new(FileRelationData::new(relation_data_path)),
        store.clone(),
    );

    let mut dispatcher = HookDispatcher::new()?;
    dispatcher.add_configured(&relation_config, manager)?;

    let handled = dispatcher.dispatch(&config.hook_name).await?;
    store.flush().await?;

    if handled == 0 {
        info!("Hook {} not handled by this relation", config.hook_name);
        return Ok(());
    }

    if let Some(manager) = dispatcher.manager(&relation_config.relation_name) {
        info!(
            "Relation {} is {} (flags: {:?})",
            relation_config.relation_name,
            manager.status().await?,
            manager.active_states().await?
        );
    }

    Ok(())
}
