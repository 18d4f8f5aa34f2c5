use super::types::{Store, STORE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default store file path (~/.config/consult-ops/store.json)
pub fn get_store_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("store.json"))
}

/// Load the store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_store(path: &Path) -> Result<Store> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file missing, starting empty");
        return Ok(Store::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open store file at {}", path.display()))?;

    let store: Store = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse store file at {}", path.display()))?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported store version: {}", store.version);
    }

    tracing::debug!(
        clients = store.clients.len(),
        projects = store.projects.len(),
        assignments = store.assignments.len(),
        "loaded store"
    );
    Ok(store)
}

/// Save the store to a JSON file atomically
///
/// The file is replaced in one step; readers never see a half-written store.
/// Creates the parent directory if it doesn't exist.
pub fn save_store(path: &Path, store: &Store) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize store")?;

    file.commit().context("Failed to save store")?;

    tracing::info!(path = %path.display(), "store saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{Associate, Client};

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = load_store(&path).unwrap();
        assert_eq!(store.version, STORE_VERSION);
        assert!(store.clients.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = Store::new();
        store.clients.push(Client {
            id: "c1".to_string(),
            name: "Acme".to_string(),
            total_revenue: 120_000.0,
            outstanding_balance: 15_000.0,
            health: Default::default(),
        });
        store.associates.push(Associate {
            id: "a1".to_string(),
            name: "Dana".to_string(),
            default_hourly_rate: Some(150.0),
        });

        save_store(&path, &store).unwrap();
        let loaded = load_store(&path).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{ "version": 7 }"#).unwrap();

        let err = load_store(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported store version"));
    }

    #[test]
    fn test_load_rejects_out_of_range_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{"version":1,"clients":[{"id":"c1","name":"A","health":{"override_score":200}}]}"#,
        )
        .unwrap();

        let err = load_store(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to parse store file"));
        assert!(message.contains("invalid health score 200"));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        assert!(load_store(&path).is_err());
    }
}
