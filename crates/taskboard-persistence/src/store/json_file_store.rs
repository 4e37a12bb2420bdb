use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use uuid::Uuid;

use crate::store::atomic_writer::AtomicWriter;
use crate::store::tables::Tables;
use crate::traits::PersistenceMetadata;

const FORMAT_VERSION: u32 = 1;

/// Saves and loads the whole table set as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
}

/// On-disk layout: `{ "version", "metadata", "data" }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: Tables,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub async fn save(&self, tables: &Tables) -> TaskboardResult<PersistenceMetadata> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(FORMAT_VERSION, self.instance_id),
            data: tables.clone(),
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!("Saved {} bytes to {}", json_bytes.len(), self.path.display());
        Ok(envelope.metadata)
    }

    /// Load the saved tables; a missing file yields empty tables.
    pub async fn load(&self) -> TaskboardResult<Tables> {
        if !self.exists() {
            tracing::info!("No data file at {}, starting empty", self.path.display());
            return Ok(Tables::default());
        }

        let file_bytes = AtomicWriter::read_all(&self.path).await?;
        let envelope: JsonEnvelope = serde_json::from_slice(&file_bytes)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;

        if envelope.version != FORMAT_VERSION {
            return Err(TaskboardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }

        tracing::info!(
            "Loaded {} boards from {}",
            envelope.data.boards.len(),
            self.path.display()
        );
        Ok(envelope.data)
    }
}
