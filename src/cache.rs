use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::ingest;
use crate::models::{Dataset, Source};
use crate::sentiment::SentimentScorer;

/// Hex SHA-256 over every source file name followed by its bytes, or a marker
/// when the file cannot be read.
pub fn fingerprint(data_dir: &Path) -> String {
    let mut hasher = Sha256::new();
    for source in Source::ALL {
        hasher.update(source.file_name().as_bytes());
        match fs::read(data_dir.join(source.file_name())) {
            Ok(bytes) => {
                hasher.update((bytes.len() as u64).to_le_bytes());
                hasher.update(&bytes);
            }
            Err(_) => hasher.update(b"\0missing"),
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Keeps one loaded [`Dataset`] until the source files change.
pub struct DatasetCache<S> {
    data_dir: PathBuf,
    scorer: S,
    current: Option<Arc<Dataset>>,
}

impl<S: SentimentScorer> DatasetCache<S> {
    pub fn new(data_dir: impl Into<PathBuf>, scorer: S) -> Self {
        Self {
            data_dir: data_dir.into(),
            scorer,
            current: None,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Return the cached snapshot if the fingerprint still matches, otherwise
    /// reload from disk.
    pub fn get_or_load(&mut self) -> Arc<Dataset> {
        let fingerprint = fingerprint(&self.data_dir);
        if let Some(dataset) = &self.current {
            if dataset.fingerprint == fingerprint {
                tracing::debug!(snapshot = %dataset.snapshot_id, "dataset cache hit");
                return Arc::clone(dataset);
            }
            tracing::info!(snapshot = %dataset.snapshot_id, "source files changed, reloading");
        }

        let dataset = Arc::new(ingest::load_dataset(&self.data_dir, &self.scorer));
        self.current = Some(Arc::clone(&dataset));
        dataset
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
