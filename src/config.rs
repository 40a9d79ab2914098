//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "./public";
pub const DEFAULT_DATASET_PATH: &str = "/data/parroquias_libertador_14.geojson";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Root of the web bundle and the boundary dataset.
    pub static_dir: PathBuf,
    /// Location of the boundary dataset under `static_dir`. Whatever file
    /// this names is served at the fixed URL the map client fetches.
    pub dataset_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            dataset_path: DEFAULT_DATASET_PATH.to_owned(),
        }
    }
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: default `./public`
    /// - `DATASET_PATH`: default `/data/parroquias_libertador_14.geojson`
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `PORT` is not a port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(lookup("PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };
        let static_dir = non_empty(lookup("STATIC_DIR")).map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);
        let mut dataset_path = non_empty(lookup("DATASET_PATH")).unwrap_or_else(|| DEFAULT_DATASET_PATH.to_owned());
        if !dataset_path.starts_with('/') {
            dataset_path.insert(0, '/');
        }
        Ok(Self { port, static_dir, dataset_path })
    }

    /// On-disk location of the boundary dataset.
    #[must_use]
    pub fn dataset_file(&self) -> PathBuf {
        self.static_dir.join(self.dataset_path.trim_start_matches('/'))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
