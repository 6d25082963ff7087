//! Directory-backed store.
//!
//! Each key maps to one file whose contents are the raw value. Writes go
//! to a per-write temporary sibling first and are renamed into place, so a
//! reader never observes a half-written value and overlapping writers to
//! one key never share a temp file.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use audit_core::{KeyValueStore, StoreResult};
use tokio::fs;
use uuid::Uuid;

/// File-per-key store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory
    pub async fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        tracing::info!(dir = %root.display(), "File store opened");
        Ok(Self { root })
    }

    /// Directory holding the key files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

/// Map a key onto a safe file name.
///
/// ASCII alphanumerics, `_` and `-` pass through; every other byte is
/// written as `%XX`, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            name.push(char::from(byte));
        } else {
            let _ = write!(name, "%{byte:02X}");
        }
    }
    name
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        // Encoded keys never contain '.', so temp names cannot shadow a key
        let tmp = self
            .root
            .join(format!("{}.{}.tmp", encode_key(key), Uuid::new_v4().simple()));
        fs::write(&tmp, value).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::debug!(key, "Stored value");
        Ok(())
    }
}
