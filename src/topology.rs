//! Static, process-wide configuration: the closed set of server names,
//! each name's listening port and neighbor list, and the places-oracle
//! endpoint. Loaded once at startup and never mutated afterward.

use crate::error::{GeofloodError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Places-of-interest oracle endpoint and credential.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub api_key: String,
}

/// One server's slice of the topology: where it listens, who it floods
/// updates to, and where its log file lives.
#[derive(Debug, Clone)]
pub struct ServerEntry {
    pub port: u16,
    pub neighbors: Vec<String>,
    pub log_path: PathBuf,
}

/// The full, immutable topology shared by every server in the herd.
#[derive(Debug, Clone)]
pub struct Topology {
    servers: BTreeMap<String, ServerEntry>,
    pub oracle: OracleConfig,
}

impl Topology {
    /// Does `name` belong to the closed set of configured servers?
    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    pub fn port(&self, name: &str) -> Option<u16> {
        self.servers.get(name).map(|e| e.port)
    }

    pub fn log_path(&self, name: &str) -> Option<&Path> {
        self.servers.get(name).map(|e| e.log_path.as_path())
    }

    /// Neighbor list for `name`. Empty slice if `name` has no outbound
    /// edges (the graph need not be symmetric or connected).
    pub fn neighbors(&self, name: &str) -> &[String] {
        self.servers
            .get(name)
            .map(|e| e.neighbors.as_slice())
            .unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(|s| s.as_str())
    }

    /// Load a topology document from a JSON file, overriding the embedded
    /// default entirely (see SPEC_FULL.md §3).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| GeofloodError::TopologyLoad {
            path: path.display().to_string(),
            source,
        })?;
        let file: TopologyFile = serde_json::from_str(&data)?;
        Ok(file.into_topology())
    }

    /// The embedded five-server graph used when `--topology` is not given.
    /// Neighbor sets mirror the shape of a small asymmetric flood graph:
    /// not every edge is reciprocated and the graph is not complete, so
    /// the flooder must rely on trail-exclusion rather than symmetry to
    /// terminate.
    pub fn embedded_default() -> Self {
        let api_key = std::env::var("GEOFLOOD_ORACLE_KEY").unwrap_or_default();
        let mut servers = BTreeMap::new();
        for (name, port, neighbors) in [
            ("Ashby", 12525u16, &["Barrow", "Corwin", "Esker"][..]),
            ("Barrow", 12526, &["Ashby", "Esker"][..]),
            ("Corwin", 12527, &["Ashby", "Dunmore", "Esker"][..]),
            ("Dunmore", 12528, &["Corwin"][..]),
            ("Esker", 12529, &["Ashby", "Barrow", "Corwin"][..]),
        ] {
            servers.insert(
                name.to_string(),
                ServerEntry {
                    port,
                    neighbors: neighbors.iter().map(|s| s.to_string()).collect(),
                    log_path: PathBuf::from(format!("./logs/{}.log", name.to_lowercase())),
                },
            );
        }
        Topology {
            servers,
            oracle: OracleConfig {
                base_url: "https://maps.googleapis.com/maps/api/place/nearbysearch/json"
                    .to_string(),
                api_key,
            },
        }
    }

    /// Build an arbitrary topology directly, bypassing the JSON file.
    /// Used by integration tests to stand up a small graph on ephemeral
    /// ports and a mock oracle endpoint.
    #[doc(hidden)]
    pub fn from_parts(
        entries: impl IntoIterator<Item = (String, u16, Vec<String>, PathBuf)>,
        oracle: OracleConfig,
    ) -> Self {
        let mut servers = BTreeMap::new();
        for (name, port, neighbors, log_path) in entries {
            servers.insert(
                name,
                ServerEntry {
                    port,
                    neighbors,
                    log_path,
                },
            );
        }
        Topology { servers, oracle }
    }
}

#[derive(Debug, Deserialize)]
struct TopologyFile {
    servers: Vec<ServerSpec>,
    oracle: OracleSpec,
}

#[derive(Debug, Deserialize)]
struct ServerSpec {
    name: String,
    port: u16,
    #[serde(default)]
    neighbors: Vec<String>,
    log_path: String,
}

#[derive(Debug, Deserialize)]
struct OracleSpec {
    base_url: String,
    #[serde(default)]
    api_key: Option<String>,
}

impl TopologyFile {
    fn into_topology(self) -> Topology {
        let mut servers = BTreeMap::new();
        for spec in self.servers {
            servers.insert(
                spec.name,
                ServerEntry {
                    port: spec.port,
                    neighbors: spec.neighbors,
                    log_path: PathBuf::from(spec.log_path),
                },
            );
        }
        let api_key = self
            .oracle
            .api_key
            .or_else(|| std::env::var("GEOFLOOD_ORACLE_KEY").ok())
            .unwrap_or_default();
        Topology {
            servers,
            oracle: OracleConfig {
                base_url: self.oracle.base_url,
                api_key,
            },
        }
    }
}
