//! Configuration, persisted as TOML.
//!
//! ```toml
//! log_filter = "cubeweave=debug"
//! propagate_mappings = true
//!
//! [store]
//! kind = "remote"
//! query_endpoint = "http://localhost:3030/cube/query"
//! update_endpoint = "http://localhost:3030/cube/update"
//!
//! [observations]
//! graph = "https://example.org/cube-graph"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{GraphStore, OxigraphStore};
use crate::error::ConfigError;
use crate::graph::Iri;
use crate::propagate::TermPropagator;

/// Where a set of documents lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Embedded, in memory. Nothing survives the process.
    #[default]
    Memory,
    /// Embedded, on disk.
    Local { path: PathBuf },
    /// SPARQL 1.1 protocol endpoints.
    Remote {
        query_endpoint: String,
        update_endpoint: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
        #[serde(default = "default_request_timeout_ms")]
        request_timeout_ms: u64,
    },
}

/// The observation dataset rewritten by term propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationsConfig {
    /// Separate backend for observations; the project store otherwise.
    #[serde(default)]
    pub backend: Option<BackendConfig>,
    /// Only rewrite observations in this graph.
    #[serde(default)]
    pub graph: Option<Iri>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeConfig {
    /// Propagate new dictionary entries unless a request says otherwise.
    #[serde(default = "default_propagate_mappings")]
    pub propagate_mappings: bool,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Backend holding project documents.
    #[serde(default)]
    pub store: BackendConfig,
    #[serde(default)]
    pub observations: ObservationsConfig,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_propagate_mappings() -> bool {
    true
}
fn default_log_filter() -> String {
    "info".into()
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            propagate_mappings: default_propagate_mappings(),
            log_filter: default_log_filter(),
            store: BackendConfig::default(),
            observations: ObservationsConfig::default(),
        }
    }
}

impl CubeConfig {
    /// A config keeping documents on disk under `path`.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            store: BackendConfig::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// The propagator for the configured observation dataset, reusing
    /// `store` when no separate backend is configured.
    pub fn propagator(&self, store: &Arc<dyn GraphStore>) -> Result<TermPropagator, ConfigError> {
        let backend = match &self.observations.backend {
            Some(config) => open_backend(config)?,
            None => Arc::clone(store),
        };
        Ok(TermPropagator::new(backend).with_graph(self.observations.graph.clone()))
    }
}

/// Open the backend a config describes.
pub fn open_backend(config: &BackendConfig) -> Result<Arc<dyn GraphStore>, ConfigError> {
    let to_config_error = |e: crate::error::StoreError| ConfigError::Backend {
        message: e.to_string(),
    };
    match config {
        BackendConfig::Memory => Ok(Arc::new(OxigraphStore::in_memory().map_err(to_config_error)?)),
        BackendConfig::Local { path } => {
            Ok(Arc::new(OxigraphStore::open(path).map_err(to_config_error)?))
        }
        #[cfg(feature = "remote")]
        BackendConfig::Remote {
            query_endpoint,
            update_endpoint,
            username,
            password,
            request_timeout_ms,
        } => {
            let mut store = crate::backend::SparqlHttpStore::new(
                query_endpoint.as_str(),
                update_endpoint.as_str(),
                std::time::Duration::from_millis(*request_timeout_ms),
            )
            .map_err(to_config_error)?;
            if let Some(username) = username {
                store = store.with_credentials(username.as_str(), password.clone().unwrap_or_default());
            }
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "remote"))]
        BackendConfig::Remote { query_endpoint, .. } => Err(ConfigError::Backend {
            message: format!(
                "{query_endpoint} is a remote endpoint, but this build lacks the `remote` feature"
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: CubeConfig = toml::from_str("").unwrap();
        assert_eq!(config, CubeConfig::default());
        assert!(config.propagate_mappings);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn parses_remote_store() {
        let config: CubeConfig = toml::from_str(
            r#"
            [store]
            kind = "remote"
            query_endpoint = "http://localhost:3030/cube/query"
            update_endpoint = "http://localhost:3030/cube/update"
            username = "admin"

            [observations]
            graph = "https://example.org/cube-graph"
            "#,
        )
        .unwrap();
        let BackendConfig::Remote {
            request_timeout_ms,
            username,
            password,
            ..
        } = &config.store
        else {
            panic!("expected a remote store");
        };
        assert_eq!(*request_timeout_ms, 30_000);
        assert_eq!(username.as_deref(), Some("admin"));
        assert!(password.is_none());
        assert_eq!(
            config.observations.graph.as_ref().map(Iri::as_str),
            Some("https://example.org/cube-graph")
        );
    }

    #[test]
    fn rejects_invalid_graph_iri() {
        let result: Result<CubeConfig, _> = toml::from_str(
            r#"
            [observations]
            graph = "not an iri"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cubeweave.toml");
        let config = CubeConfig::local(dir.path().join("data"));
        config.save(&path).unwrap();
        assert_eq!(CubeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = CubeConfig::load(Path::new("/nonexistent/cubeweave.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn opens_embedded_backends() {
        assert!(open_backend(&BackendConfig::Memory).is_ok());
        let dir = tempfile::TempDir::new().unwrap();
        assert!(open_backend(&BackendConfig::Local {
            path: dir.path().join("store")
        })
        .is_ok());
    }
}
