//! Saving and loading layer sets.
//!
//! A layer set file is the layer record array wrapped in a small metadata
//! envelope, JSON on disk. The same array round-trips through undo/redo
//! history snapshots, so the on-disk shape and the in-memory shape are one
//! and the same.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::model::Layer;
use crate::store::LayerStore;

/// Layer set file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete layer set file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSetFile {
    pub version: String,
    pub metadata: LayerSetMetadata,
    pub layers: Vec<Layer>,
}

/// Layer set metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSetMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

impl LayerSetFile {
    /// Create a new empty layer set
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: LayerSetMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            layers: Vec::new(),
        }
    }

    pub fn from_store(name: impl Into<String>, store: &LayerStore) -> Self {
        let mut file = Self::new(name);
        file.layers = store.layers().to_vec();
        file
    }

    /// Save the layer set to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize layer set")?;
        std::fs::write(path.as_ref(), json).context("Failed to write layer set file")?;
        info!(path = %path.as_ref().display(), layers = self.layers.len(), "layer set saved");
        Ok(())
    }

    /// Load a layer set from a file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read layer set file")?;

        let mut set: LayerSetFile =
            serde_json::from_str(&content).context("Failed to parse layer set file")?;

        // Update modified timestamp
        set.metadata.modified = Utc::now();

        Ok(set)
    }

    pub fn into_store(self) -> LayerStore {
        LayerStore::from_layers(self.layers)
    }
}
