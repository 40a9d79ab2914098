//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server keeps no map data; it holds the parsed config and the source that
//! per-request environment reads go through.

use std::sync::Arc;

use crate::config::ServerConfig;

/// Reads one environment variable. Swapped out in tests.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub env: EnvLookup,
}

impl AppState {
    /// State backed by the live process environment.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_env(config, Arc::new(|key: &str| std::env::var(key).ok()))
    }

    #[must_use]
    pub fn with_env(config: ServerConfig, env: EnvLookup) -> Self {
        Self { config: Arc::new(config), env }
    }
}
