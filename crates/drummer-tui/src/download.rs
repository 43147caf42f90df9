//! Saving processed/original renditions to the downloads directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use drummer_proto::protocol::{DownloadVariant, SongId};
use tracing::info;

/// Which (song, variant) downloads are currently running.
#[derive(Debug, Default)]
pub struct DownloadTracker {
    active: HashSet<(SongId, DownloadVariant)>,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a download. `false` if the same one is already running.
    pub fn begin(&mut self, song_id: &str, variant: DownloadVariant) -> bool {
        self.active.insert((song_id.to_string(), variant))
    }

    pub fn finish(&mut self, song_id: &str, variant: DownloadVariant) {
        self.active.remove(&(song_id.to_string(), variant));
    }

    pub fn is_active(&self, song_id: &str, variant: DownloadVariant) -> bool {
        self.active.contains(&(song_id.to_string(), variant))
    }
}

/// Write `bytes` to `dir/<file_name>`, creating `dir` if needed.
/// An existing file of the same name is overwritten.
pub async fn save_download(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    if !dir.exists() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    info!("saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tracker_refuses_duplicates_per_variant() {
        let mut tracker = DownloadTracker::new();
        assert!(tracker.begin("1", DownloadVariant::Processed));
        assert!(!tracker.begin("1", DownloadVariant::Processed));
        assert!(tracker.begin("1", DownloadVariant::Original));
        assert!(tracker.is_active("1", DownloadVariant::Processed));
        assert!(tracker.is_active("1", DownloadVariant::Original));

        tracker.finish("1", DownloadVariant::Processed);
        assert!(!tracker.is_active("1", DownloadVariant::Processed));
        assert!(tracker.begin("1", DownloadVariant::Processed));
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("downloads");
        let name = DownloadVariant::Processed.file_name("Take Five");

        let path = save_download(&dir, &name, b"mp3data").await.unwrap();
        assert_eq!(path, dir.join("Take Five_no_drums.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"mp3data");

        // Saving again overwrites.
        save_download(&dir, &name, b"v2").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"v2");
    }
}
