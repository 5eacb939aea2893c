//! Local media blob store
//!
//! Uploaded photos and receipts live under `<root>/media/` and are served
//! back over HTTP at `/media/...`. Object names are collision-resistant
//! (random token + millisecond timestamp + original extension) and
//! existing objects are never overwritten.

use bagtag_common::{Error, Result};
use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Which media sub-folder an upload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    ClubPhotos,
    ReceiptPhotos,
}

impl MediaFolder {
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaFolder::ClubPhotos => "club-photos",
            MediaFolder::ReceiptPhotos => "receipt-photos",
        }
    }
}

/// Lowercased alphanumeric extension from an uploaded file name
///
/// Anything suspicious collapses to "bin"; the extension only exists so
/// browsers pick a sensible viewer.
fn sanitized_extension(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext
    }
}

fn generate_object_name(original_name: &str) -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!(
        "{}-{}.{}",
        token,
        Utc::now().timestamp_millis(),
        sanitized_extension(original_name)
    )
}

/// Media store rooted at `<root_folder>/media`
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store uploaded bytes, returning the public `/media/...` URL path
    pub async fn store(
        &self,
        folder: MediaFolder,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let dir = self.root.join(folder.dir_name());
        tokio::fs::create_dir_all(&dir).await?;

        // The token makes collisions vanishingly unlikely, but never
        // overwrite: retry with a fresh name on AlreadyExists.
        for _ in 0..3 {
            let object_name = generate_object_name(original_name);
            let path = dir.join(&object_name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    use tokio::io::AsyncWriteExt;
                    let mut file = file;
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    tracing::debug!(
                        path = %path.display(),
                        size = bytes.len(),
                        "Stored media object"
                    );
                    return Ok(format!("/media/{}/{}", folder.dir_name(), object_name));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        Err(Error::Internal(
            "Failed to allocate a unique media object name".to_string(),
        ))
    }
}
