use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::{Error, Result};

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];
pub const ARTWORK_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

const AUDIO_DIR: &str = "audio";
const ARTWORK_DIR: &str = "artwork";
const DEFAULTS_DIR: &str = "defaults";
const PLACEHOLDER_ARTWORK: &str = "defaults/artwork.png";

/// Filesystem-backed blob store. Files land under `root/{audio,artwork}` with
/// generated names and are served back under `{public_base}/media/…`.
#[derive(Clone)]
pub struct BlobService {
    root: PathBuf,
    public_base: String,
}

impl BlobService {
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        Self {
            root,
            public_base: public_base.into(),
        }
    }

    /// Creates the category directories; called once at startup (and by
    /// tests against a scratch root).
    pub async fn ensure_layout(&self) -> Result<()> {
        for dir in [AUDIO_DIR, ARTWORK_DIR, DEFAULTS_DIR] {
            fs::create_dir_all(self.root.join(dir)).await?;
        }
        Ok(())
    }

    pub fn default_artwork_url(&self) -> String {
        format!("{}/media/{}", self.public_base, PLACEHOLDER_ARTWORK)
    }

    pub async fn store_audio(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        self.store(AUDIO_DIR, AUDIO_EXTENSIONS, file_name, bytes).await
    }

    pub async fn store_artwork(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        self.store(ARTWORK_DIR, ARTWORK_EXTENSIONS, file_name, bytes).await
    }

    async fn store(
        &self,
        category: &str,
        allowed: &[&str],
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let ext = extension_of(file_name, allowed)?;
        let key = format!("{}/{}.{}", category, Uuid::new_v4(), ext);

        fs::write(self.root.join(&key), bytes).await?;

        Ok(format!("{}/media/{}", self.public_base, key))
    }

    /// Removes the file behind one of our public URLs. URLs that are not
    /// ours (placeholder, foreign hosts) and already-missing files are
    /// silently fine; deletion is used for best-effort cleanup paths.
    pub async fn delete_by_url(&self, url: &str) -> Result<()> {
        let Some(key) = self.key_for_url(url) else {
            return Ok(());
        };

        match fs::remove_file(self.root.join(&key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::IoError(err.to_string())),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/media/", self.public_base);
        let key = url.strip_prefix(&prefix)?;

        // Never delete outside the store or the shared placeholder.
        if key.starts_with(DEFAULTS_DIR) {
            return None;
        }
        let path = Path::new(key);
        if path
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return None;
        }

        Some(key.to_string())
    }
}

fn extension_of(file_name: &str, allowed: &[&str]) -> Result<String> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| Error::InvalidField {
            field: "file".to_string(),
            reason: format!("'{}' has no file extension", file_name),
        })?;

    if !allowed.contains(&ext.as_str()) {
        return Err(Error::InvalidField {
            field: "file".to_string(),
            reason: format!("unsupported extension '{}'", ext),
        });
    }

    Ok(ext)
}
