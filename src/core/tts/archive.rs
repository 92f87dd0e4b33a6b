//! On-disk archive of synthesized clips.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use uuid::Uuid;

/// Writes MP3 clips into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct AudioArchive {
    dir: PathBuf,
}

impl AudioArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `audio` as `tts-<unix millis>-<id>.mp3` and return its path.
    pub async fn save_mp3(&self, audio: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let id = Uuid::new_v4().simple().to_string();
        let path = self.dir.join(format!("tts-{millis}-{}.mp3", &id[..8]));

        tokio::fs::write(&path, audio).await?;
        debug!(path = %path.display(), bytes = audio.len(), "Archived synthesized audio");
        Ok(path)
    }
}
