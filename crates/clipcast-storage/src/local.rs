//! Local-filesystem video storage.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Storage configuration, read from env.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for completed MP4s and per-job temp scratch space.
    pub output_dir: PathBuf,
    /// Public domain used to mint absolute video/download URLs.
    pub public_domain: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./data".to_string()).into(),
            public_domain: std::env::var("RAILWAY_PUBLIC_DOMAIN").ok(),
        }
    }
}

/// Local-filesystem store for completed video files.
#[derive(Clone)]
pub struct LocalVideoStorage {
    output_dir: PathBuf,
    public_domain: Option<String>,
}

impl LocalVideoStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            output_dir: config.output_dir,
            public_domain: config.public_domain,
        }
    }

    pub fn from_env() -> Self {
        Self::new(StorageConfig::from_env())
    }

    /// Per-job temp scratch directory. Callers create/clean it up themselves.
    pub fn job_temp_dir(&self, job_id: &str) -> PathBuf {
        self.output_dir.join("tmp").join(job_id)
    }

    /// Final path a completed video is stored at.
    pub fn video_path(&self, job_id: &str) -> PathBuf {
        self.output_dir.join("videos").join(format!("{job_id}.mp4"))
    }

    /// Move a finished video (produced at `from`) into its final resting
    /// place, creating parent directories as needed.
    pub async fn store_video(&self, job_id: &str, from: impl AsRef<Path>) -> StorageResult<PathBuf> {
        let dest = self.video_path(job_id);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(from.as_ref(), &dest)
            .await
            .map_err(|e| StorageError::write_failed(format!("failed to move video into place: {e}")))?;
        info!("stored video for job {} at {}", job_id, dest.display());
        Ok(dest)
    }

    /// Read a completed video's bytes back for streaming to the client.
    pub async fn read_video(&self, job_id: &str) -> StorageResult<Vec<u8>> {
        let path = self.video_path(job_id);
        tokio::fs::read(&path).await.map_err(|_| StorageError::not_found(job_id))
    }

    pub async fn video_exists(&self, job_id: &str) -> bool {
        tokio::fs::metadata(self.video_path(job_id)).await.is_ok()
    }

    /// Absolute URL to stream/play the finished video, using
    /// `RAILWAY_PUBLIC_DOMAIN` when configured, falling back to a relative path.
    pub fn generate_video_url(&self, job_id: &str) -> String {
        self.absolute_path(&format!("/api/download-video/{job_id}"))
    }

    /// Absolute URL for the download endpoint. Identical path to
    /// `generate_video_url` today; kept distinct since the two may diverge
    /// (e.g. a `?download=1` query flag) without touching call sites.
    pub fn generate_download_url(&self, job_id: &str) -> String {
        self.absolute_path(&format!("/api/download-video/{job_id}"))
    }

    fn absolute_path(&self, path: &str) -> String {
        match &self.public_domain {
            Some(domain) => format!("https://{domain}{path}"),
            None => path.to_string(),
        }
    }

    /// Delete every stored video whose mtime is older than `max_age`. Used by
    /// the hourly retention sweep; returns the number of files removed.
    pub async fn sweep_expired(&self, max_age: std::time::Duration) -> StorageResult<usize> {
        let videos_dir = self.output_dir.join("videos");
        let mut removed = 0;

        let mut entries = match tokio::fs::read_dir(&videos_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = std::time::SystemTime::now();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            let Ok(modified) = metadata.modified() else { continue };
            let Ok(age) = now.duration_since(modified) else { continue };
            if age > max_age {
                debug!("retention sweep removing {}", entry.path().display());
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(root: &Path) -> LocalVideoStorage {
        LocalVideoStorage::new(StorageConfig {
            output_dir: root.to_path_buf(),
            public_domain: None,
        })
    }

    #[test]
    fn video_url_is_relative_without_public_domain() {
        let dir = TempDir::new().unwrap();
        let storage = storage(dir.path());
        assert_eq!(storage.generate_video_url("abc"), "/api/download-video/abc");
    }

    #[test]
    fn video_url_is_absolute_with_public_domain() {
        let storage = LocalVideoStorage::new(StorageConfig {
            output_dir: "/tmp".into(),
            public_domain: Some("clipcast.up.railway.app".to_string()),
        });
        assert_eq!(
            storage.generate_video_url("abc"),
            "https://clipcast.up.railway.app/api/download-video/abc"
        );
    }

    #[tokio::test]
    async fn store_video_moves_file_into_place() {
        let dir = TempDir::new().unwrap();
        let storage = storage(dir.path());
        let src = dir.path().join("render_output.mp4");
        tokio::fs::write(&src, b"fake mp4 bytes").await.unwrap();

        let dest = storage.store_video("job1", &src).await.unwrap();
        assert!(dest.exists());
        assert!(!src.exists());
        assert!(storage.video_exists("job1").await);
    }

    #[tokio::test]
    async fn sweep_expired_removes_old_files_only() {
        let dir = TempDir::new().unwrap();
        let storage = storage(dir.path());
        let videos_dir = dir.path().join("videos");
        tokio::fs::create_dir_all(&videos_dir).await.unwrap();
        tokio::fs::write(videos_dir.join("fresh.mp4"), b"x").await.unwrap();

        let removed = storage.sweep_expired(std::time::Duration::from_secs(3600)).await.unwrap();
        assert_eq!(removed, 0, "freshly-written file must not be swept");
    }

    #[tokio::test]
    async fn sweep_expired_on_missing_dir_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let storage = storage(dir.path());
        let removed = storage.sweep_expired(std::time::Duration::from_secs(1)).await.unwrap();
        assert_eq!(removed, 0);
    }
}
