//! Store and history persistence
//!
//! JSON files written atomically (write to a temp file in the target
//! directory, then rename) so an interrupted save never truncates the
//! previous state. A missing file loads as empty state; a present but
//! malformed file is an error.

use crate::error::Result;
use crate::rating::store::RatingStore;
use crate::types::{MatchRecord, StoreDocument};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

/// Load the rating store, or an empty one if the file does not exist
pub fn load_store(path: &Path) -> Result<RatingStore> {
    if !path.exists() {
        info!("No store at {}, starting fresh", path.display());
        return Ok(RatingStore::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Store file {} is not valid JSON", path.display()))?;
    let document = StoreDocument::from_value(value)
        .with_context(|| format!("Store file {} is malformed", path.display()))?;

    let store = RatingStore::from_document(document);
    info!("Loaded ratings for {} dishes from {}", store.len(), path.display());
    Ok(store)
}

/// Save the rating store, stamping `last_updated`
pub fn save_store(path: &Path, store: &RatingStore) -> Result<()> {
    let document = store.to_document();
    let json = serde_json::to_string_pretty(&document)?;
    write_atomic(path, &json)?;
    info!("Saved ratings for {} dishes to {}", store.len(), path.display());
    Ok(())
}

/// Load the match history, or an empty one if the file does not exist
pub fn load_history(path: &Path) -> Result<Vec<MatchRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {}", path.display()))?;
    let history: Vec<MatchRecord> = serde_json::from_str(&content)
        .with_context(|| format!("History file {} is malformed", path.display()))?;
    Ok(history)
}

/// Save the match history in chronological order
pub fn save_history(path: &Path, history: &[MatchRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(history)?;
    write_atomic(path, &json)?;
    Ok(())
}

/// Remove persisted state entirely. Missing files are not an error.
pub fn reset(store_path: &Path, history_path: &Path) -> Result<()> {
    for path in [store_path, history_path] {
        match fs::remove_file(path) {
            Ok(()) => info!("Removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to remove {}", path.display()))
            }
        }
    }
    Ok(())
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());

    let mut file = match directory {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .with_context(|| format!("Failed to create temp file next to {}", path.display()))?;

    use std::io::Write;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::elo::DEFAULT_K_FACTOR;

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(&dir.path().join("absent.json")).unwrap();
        let history = load_history(&dir.path().join("absent_history.json")).unwrap();

        assert!(store.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elo_ratings.json");

        let mut store = RatingStore::new();
        store.record_match("炒饭", "白粥", DEFAULT_K_FACTOR).unwrap();

        save_store(&path, &store).unwrap();
        let reloaded = load_store(&path).unwrap();

        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match_history.json");

        let history = vec![
            MatchRecord::new("炒饭", "白粥"),
            MatchRecord::new("盐酥鸡", "卤肉饭"),
        ];

        save_history(&path, &history).unwrap();
        let reloaded = load_history(&path).unwrap();

        assert_eq!(reloaded, history);
    }

    #[test]
    fn test_load_rejects_missing_required_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"games_played": {}}"#).unwrap();

        let err = load_store(&path).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_reset_removes_state() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("elo_ratings.json");
        let history_path = dir.path().join("match_history.json");

        save_store(&store_path, &RatingStore::new()).unwrap();
        reset(&store_path, &history_path).unwrap();

        assert!(!store_path.exists());
        // Resetting again is fine even though nothing is left.
        reset(&store_path, &history_path).unwrap();
    }
}
