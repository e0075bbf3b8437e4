//! Locate servers and their current mission export under a saved-games root
//!
//! Layout: `<saved_games>/<server>/Missions/Saves/*foothold*.lua`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::error::{Result, SitacError};
use crate::sitac::{load_sitac, Sitac};

const SAVES_DIR: [&str; 2] = ["Missions", "Saves"];

pub struct ServerDirectory {
    base: PathBuf,
}

impl ServerDirectory {
    pub fn new(saved_games: impl Into<PathBuf>) -> Self {
        Self {
            base: saved_games.into(),
        }
    }

    /// Names of servers with an active mission, sorted
    pub fn list_servers(&self) -> Result<Vec<String>> {
        if !self.base.is_dir() {
            return Err(SitacError::Config(format!(
                "{:?} is not a valid directory",
                self.base
            )));
        }

        let entries =
            fs::read_dir(&self.base).map_err(|e| SitacError::storage(&self.base, e))?;

        let mut servers = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') || !path.is_dir() {
                continue;
            }
            if find_latest_export(&path).is_some() {
                servers.push(name.to_string());
            }
        }

        servers.sort();
        debug!(base = %self.base.display(), count = servers.len(), "listed servers");
        Ok(servers)
    }

    /// Directory of a server, `None` for names that would escape the base
    pub fn server_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name == "."
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return None;
        }
        Some(self.base.join(name))
    }

    /// Newest export file of a server
    pub fn detect_mission_path(&self, name: &str) -> Option<PathBuf> {
        find_latest_export(&self.server_path(name)?)
    }

    /// Load the current sitac of a server
    ///
    /// An unreadable or unparsable export is reported as not found, like a
    /// missing one. Typed validation failures are passed through.
    pub fn active_sitac(&self, name: &str) -> Result<Sitac> {
        let server_dir = self
            .server_path(name)
            .filter(|p| p.is_dir())
            .ok_or_else(|| SitacError::not_found(format!("server '{}'", name)))?;

        let path = find_latest_export(&server_dir)
            .ok_or_else(|| SitacError::not_found(format!("mission of server '{}'", name)))?;

        match load_sitac(&path) {
            Err(SitacError::Load(err)) => {
                warn!(server = name, error = %err, "cannot load mission export");
                Err(SitacError::not_found(format!("mission of server '{}'", name)))
            }
            other => other,
        }
    }

    /// Like `active_sitac`, for callers that treat any failure as absence
    pub fn sitac_or_none(&self, name: &str) -> Option<Sitac> {
        match self.active_sitac(name) {
            Ok(sitac) => Some(sitac),
            Err(err) => {
                warn!(server = name, error = %err, "no sitac available");
                None
            }
        }
    }
}

fn is_export_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains("foothold") && n.ends_with(".lua"))
}

fn find_latest_export(server_dir: &Path) -> Option<PathBuf> {
    let saves = SAVES_DIR.iter().fold(server_dir.to_path_buf(), |p, d| p.join(d));
    let entries = fs::read_dir(&saves).ok()?;

    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_export_file(path))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .max_by(|(a, pa), (b, pb)| a.cmp(b).then_with(|| pa.cmp(pb)))
        .map(|(_, path)| path)
}
