use crate::error::{StudioError, StudioResult};
use crate::state::DesignState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A saved design document: metadata plus the full editable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<PathBuf>,
    pub state: DesignState,
}

impl Draft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_image: None,
            state: DesignState::default(),
        }
    }
}

/// Explicit persistence seam for saved designs.
///
/// The editor only ever goes through this interface; it never reads
/// ambient global storage.
pub trait DraftRepository {
    fn get(&self, id: Uuid) -> StudioResult<Draft>;
    fn list(&self) -> StudioResult<Vec<Draft>>;
    fn save(&self, draft: &Draft) -> StudioResult<()>;
    fn delete(&self, id: Uuid) -> StudioResult<()>;
}

/// One pretty-printed JSON file per draft under a directory.
pub struct JsonDraftRepository {
    dir: PathBuf,
}

impl JsonDraftRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read_draft(path: &Path) -> StudioResult<Draft> {
        let json = fs::read_to_string(path).map_err(StudioError::Storage)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl DraftRepository for JsonDraftRepository {
    fn get(&self, id: Uuid) -> StudioResult<Draft> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StudioError::DraftNotFound(id));
        }
        Self::read_draft(&path)
    }

    fn list(&self) -> StudioResult<Vec<Draft>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut drafts = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(StudioError::Storage)? {
            let entry = entry.map_err(StudioError::Storage)?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match Self::read_draft(&path) {
                Ok(draft) => drafts.push(draft),
                Err(err) => {
                    // A corrupt file should not hide every other draft.
                    log::warn!("Skipping unreadable draft {}: {err}", path.display());
                }
            }
        }
        drafts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drafts)
    }

    fn save(&self, draft: &Draft) -> StudioResult<()> {
        fs::create_dir_all(&self.dir).map_err(StudioError::Storage)?;
        let json = serde_json::to_string_pretty(draft)?;
        fs::write(self.path_for(draft.id), json).map_err(StudioError::Storage)?;
        log::info!("Saved draft {} ({})", draft.name, draft.id);
        Ok(())
    }

    fn delete(&self, id: Uuid) -> StudioResult<()> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StudioError::DraftNotFound(id))
            }
            Err(err) => Err(StudioError::Storage(err)),
        }
    }
}
