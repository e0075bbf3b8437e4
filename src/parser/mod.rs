pub mod chunk;
pub mod lexer;
pub mod record;
pub mod value;

pub use chunk::{parse_chunk, parse_value};
pub use record::Record;
pub use value::{LuaKey, LuaTable, LuaValue};

use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::error::LoadError;

/// Global table written by the Foothold persistence script
pub const ZONE_PERSISTENCE_GLOBAL: &str = "zonePersistance";

/// Read an export file and return one of its global tables
///
/// Every call parses the file from scratch.
pub fn load_global(path: &Path, name: &str) -> Result<LuaTable, LoadError> {
    let start = Instant::now();

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8_lossy(&bytes);

    let mut globals = parse_chunk(&source).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let table = match globals.remove(name) {
        None => {
            return Err(LoadError::MissingGlobal {
                path: path.to_path_buf(),
                name: name.to_string(),
            })
        }
        Some(LuaValue::Table(table)) => table,
        Some(_) => {
            return Err(LoadError::NotATable {
                path: path.to_path_buf(),
                name: name.to_string(),
            })
        }
    };

    debug!(
        path = %path.display(),
        global = name,
        entries = table.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "parsed export"
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_global() {
        let file = write_tmp(r#"zonePersistance = { ["zones"] = {} }"#);
        let table = load_global(file.path(), ZONE_PERSISTENCE_GLOBAL).unwrap();
        assert!(table.get_table("zones").unwrap().is_empty());
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let file = write_tmp("zonePersistance = {}");
        let table = load_global(file.path(), ZONE_PERSISTENCE_GLOBAL).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_global() {
        let file = write_tmp("other = {}\nzonePersistance = nil");
        let err = load_global(file.path(), ZONE_PERSISTENCE_GLOBAL).unwrap_err();
        assert!(matches!(err, LoadError::MissingGlobal { .. }));
    }

    #[test]
    fn test_global_not_a_table() {
        let file = write_tmp("zonePersistance = 3");
        let err = load_global(file.path(), ZONE_PERSISTENCE_GLOBAL).unwrap_err();
        assert!(matches!(err, LoadError::NotATable { .. }));
    }

    #[test]
    fn test_unreadable_and_malformed_files() {
        let err = load_global(Path::new("/nonexistent/foothold.lua"), "x").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));

        let file = write_tmp("zonePersistance = {");
        let err = load_global(file.path(), ZONE_PERSISTENCE_GLOBAL).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
