use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use super::model::Briefing;
use crate::error::{Result, SitacError};

/// Sub-directory of the saved-games root holding briefing files
pub const BRIEFINGS_DIR: &str = "_briefings";

/// One pretty-printed `<id>.json` file per briefing
///
/// No locking: concurrent writers to the same briefing race and the last
/// write wins.
#[derive(Debug, Clone)]
pub struct BriefingStore {
    dir: PathBuf,
}

impl BriefingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `<saved_games>/_briefings`
    pub fn for_saved_games(saved_games: &Path) -> Self {
        Self::new(saved_games.join(BRIEFINGS_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn save(&self, briefing: &Briefing) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| SitacError::storage(&self.dir, e))?;

        let path = self.file(briefing.id);
        let json = serde_json::to_string_pretty(briefing)
            .map_err(|e| SitacError::storage(&path, e))?;
        fs::write(&path, json).map_err(|e| SitacError::storage(&path, e))?;

        debug!(id = %briefing.id, path = %path.display(), "saved briefing");
        Ok(())
    }

    pub fn load(&self, id: Uuid) -> Result<Option<Briefing>> {
        let path = self.file(id);
        if !path.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path).map_err(|e| SitacError::storage(&path, e))?;
        let briefing = serde_json::from_str(&text).map_err(|e| SitacError::storage(&path, e))?;
        Ok(Some(briefing))
    }

    /// Returns false when there was nothing to delete
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let path = self.file(id);
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| SitacError::storage(&path, e))?;
        Ok(true)
    }

    /// Briefings, newest update first, optionally for one server
    ///
    /// Files that are not valid briefings are skipped.
    pub fn list(&self, server: Option<&str>) -> Result<Vec<Briefing>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SitacError::storage(&self.dir, e)),
        };

        let mut briefings = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            else {
                warn!(path = %path.display(), "skipping file with invalid briefing id");
                continue;
            };

            match self.load(id) {
                Ok(Some(briefing)) => {
                    if server.map_or(true, |s| briefing.server_name == s) {
                        briefings.push(briefing);
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "skipping unreadable briefing"),
            }
        }

        briefings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(briefings)
    }
}
