//! Configuration for transports and the access layer.
//!
//! [`StoreConfig`] is handed once to a transport builder; [`AccessConfig`] once to an
//! [`AccessLayer`](crate::store::AccessLayer). Nothing is read from global state.

use serde::{Deserialize, Serialize};

/// Settings applied when a transport is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Whether the transport may keep a local persistent copy of documents.
    pub persistence_enabled: bool,
    /// The project or database the transport connects to.
    pub project: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { persistence_enabled: true, project: None }
    }
}

impl StoreConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// How query reads treat documents that fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Return whatever decoded; decode failures are only logged unless nothing decoded.
    #[default]
    Lossy,
    /// Fail the whole read with every recorded cause if any document failed to decode.
    Strict,
}

/// Settings for an [`AccessLayer`](crate::store::AccessLayer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub read_policy: ReadPolicy,
}

impl AccessConfig {
    pub fn strict() -> Self {
        Self { read_policy: ReadPolicy::Strict }
    }
}
