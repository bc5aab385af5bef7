//! Directory-backed record store: one `<id>.json` file per pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use super::PipelineRecord;
use crate::error::{DesignerError, Result, ResultExt};

#[derive(Debug, Clone)]
pub struct PipelineStore {
    dir: PathBuf,
}

impl PipelineStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(DesignerError::from)
            .with_context(|| format!("creating pipeline store at {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DesignerError::Storage(format!("invalid record id '{}'", id)));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    /// Write `record`, replacing any previous record with the same id.
    pub fn save(&self, record: &PipelineRecord) -> Result<()> {
        let path = self.record_path(&record.id)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content)
            .map_err(DesignerError::from)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Saved pipeline '{}' to {:?}", record.id, path);
        Ok(())
    }

    pub fn load(&self, id: &str) -> Result<PipelineRecord> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Err(DesignerError::RecordNotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&content)
            .map_err(DesignerError::from)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(record)
    }

    /// All readable records, newest first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<PipelineRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(DesignerError::from)
                .and_then(|content| Ok(serde_json::from_str::<PipelineRecord>(&content)?));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable record {:?}: {}", path, e),
            }
        }
        records.sort_by(|a, b| b.create_time.cmp(&a.create_time).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id)?;
        if !path.exists() {
            return Err(DesignerError::RecordNotFound(id.to_string()));
        }
        fs::remove_file(&path)?;
        tracing::info!("Deleted pipeline '{}'", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_save_load_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path().join("pipelines")).unwrap();

        let mut record = PipelineRecord::new("line-1", "第一版");
        store.save(&record).unwrap();
        record.name = "第二版".into();
        store.save(&record).unwrap();

        assert_eq!(store.load("line-1").unwrap().name, "第二版");
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        assert!(matches!(store.load("nope"), Err(DesignerError::RecordNotFound(_))));
        assert!(matches!(store.delete("nope"), Err(DesignerError::RecordNotFound(_))));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let record = PipelineRecord::new("../escape", "x");
        assert!(matches!(store.save(&record), Err(DesignerError::Storage(_))));
    }

    #[test]
    fn test_list_newest_first_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = PipelineStore::open(dir.path()).unwrap();
        let mut old = PipelineRecord::new("old", "旧");
        old.create_time = Utc::now() - Duration::days(3);
        store.save(&old).unwrap();
        store.save(&PipelineRecord::new("new", "新")).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "old"]);

        store.delete("old").unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
