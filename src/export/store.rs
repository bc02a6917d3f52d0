use crate::error::{StudioError, StudioResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Where published assets land. The editor treats this as opaque: bytes go
/// in, a publicly resolvable URL comes out.
pub trait FileStore: Send + Sync {
    fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> StudioResult<String>;

    /// Public URL for a stored path, without uploading anything.
    fn url_for(&self, path: &str) -> String;
}

/// A `FileStore` backed by a local directory.
///
/// Content types are persisted as sidecar `.meta` files (the directory has
/// no real metadata channel) and mirrored in memory for quick lookup from
/// any thread.
pub struct DirectoryStore {
    root: PathBuf,
    base_url: String,
    content_types: Mutex<HashMap<String, String>>,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            root: root.into(),
            base_url,
            content_types: Mutex::new(HashMap::new()),
        }
    }

    pub fn content_type_of(&self, path: &str) -> Option<String> {
        self.content_types.lock().get(path).cloned()
    }
}

impl FileStore for DirectoryStore {
    fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> StudioResult<String> {
        let dest = self.root.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(StudioError::Storage)?;
        }
        fs::write(&dest, bytes).map_err(|source| StudioError::Upload {
            path: path.to_owned(),
            source,
        })?;

        let meta = dest.with_extension("meta");
        fs::write(&meta, content_type).map_err(|source| StudioError::Upload {
            path: path.to_owned(),
            source,
        })?;
        self.content_types
            .lock()
            .insert(path.to_owned(), content_type.to_owned());

        log::info!("Stored {} bytes at {path} ({content_type})", bytes.len());
        Ok(self.url_for(path))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
