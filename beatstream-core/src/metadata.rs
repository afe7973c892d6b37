//! Sidecar metadata for audio files
//!
//! Each audio file `<name>` may have a `<name>.json` companion in the
//! metadata directory. Sidecars are optional: any problem loading one is
//! logged and replaced by an empty record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Descriptive fields not derivable from the audio file itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Unique identifier of the track
    pub id: String,
    /// Display name
    pub name: String,
    pub author: String,
    /// Precomputed FFT descriptor for visualisers
    pub fft: String,
    /// Cover image URL or path
    pub cover_img: String,
}

/// Reads sidecar metadata from a directory.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the sidecar belonging to `audio_name`.
    pub fn sidecar_path(&self, audio_name: &str) -> PathBuf {
        self.dir.join(format!("{audio_name}.json"))
    }

    /// Load metadata for `audio_name`, falling back to an empty record.
    pub async fn load(&self, audio_name: &str) -> Metadata {
        let path = self.sidecar_path(audio_name);

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Metadata file not found for {audio_name}");
                return Metadata::default();
            }
            Err(e) => {
                warn!("Could not read metadata {}: {e}", path.display());
                return Metadata::default();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Error parsing metadata for {audio_name}: {e}");
                Metadata::default()
            }
        }
    }
}
