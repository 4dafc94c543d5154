use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::models::Source;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolved runtime settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>, log_level: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: log_level.into(),
        }
    }

    pub fn source_path(&self, source: Source) -> PathBuf {
        self.data_dir.join(source.file_name())
    }

    /// Sources whose export file is not present in the data directory.
    pub fn missing_sources(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|source| !self.source_path(*source).is_file())
            .collect()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Install the fmt subscriber on stderr so stdout stays clean for output.
pub fn init_logging(level: &str) {
    let env_filter =
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(Source::Reels.file_name()), "[]").unwrap();
        let settings = Settings::new(dir.path(), DEFAULT_LOG_LEVEL);
        assert_eq!(
            settings.missing_sources(),
            vec![Source::Likes, Source::Messages, Source::Ads, Source::Videos]
        );
        assert_eq!(
            settings.source_path(Source::Videos),
            dir.path().join("insta_mood_mock_watch_history.json")
        );
    }
}
