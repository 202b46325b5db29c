use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ann_types::StoreEnvelope;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::EnvelopeStore;

/// Default file name when no path is configured.
pub const DEFAULT_ANNOTATIONS_FILE: &str = "annotations.json";

/// Envelope store backed by a single pretty-printed JSON file.
///
/// Saves write the full document to a temporary file in the same directory
/// and rename it onto the target. If the rename fails (some platforms refuse
/// to rename over an existing file) the target is removed and the rename is
/// retried once.
#[derive(Clone, Debug)]
pub struct FileEnvelopeStore {
    path: PathBuf,
}

impl FileEnvelopeStore {
    /// Store rooted at `path`. Nothing is touched until `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent directory if the path has a non-empty one.
    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn temp_file(&self, dir: &Path) -> io::Result<NamedTempFile> {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_ANNOTATIONS_FILE.to_string());
        let prefix = format!(".{name}.");

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o644));
        }
        builder.tempfile_in(dir)
    }

    fn persist(&self, tmp: NamedTempFile) -> StoreResult<()> {
        let err = match tmp.persist(&self.path) {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        warn!(
            path = %self.path.display(),
            error = %err.error,
            "rename onto annotations file failed; removing target and retrying"
        );
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(error = %e, "could not remove annotations file before retry");
        }

        // On a second failure the temporary file is dropped, which deletes it.
        err.file
            .persist(&self.path)
            .map(|_| ())
            .map_err(|e| StoreError::Persist {
                path: self.path.clone(),
                source: e.error,
            })
    }
}

impl Default for FileEnvelopeStore {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOTATIONS_FILE)
    }
}

impl EnvelopeStore for FileEnvelopeStore {
    fn load(&self) -> StoreResult<StoreEnvelope> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "annotations file absent; starting empty");
                return Ok(StoreEnvelope::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if data.is_empty() {
            debug!(path = %self.path.display(), "annotations file empty; starting empty");
            return Ok(StoreEnvelope::new());
        }

        let envelope: StoreEnvelope =
            serde_json::from_slice(&data).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            records = envelope.len(),
            "loaded annotations"
        );
        Ok(envelope)
    }

    fn save(&self, envelope: &StoreEnvelope) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(envelope)?;

        let dir = match self.parent_dir() {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|source| StoreError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
                parent
            }
            None => Path::new("."),
        };

        let write_err = |source| StoreError::Write {
            path: dir.to_path_buf(),
            source,
        };
        let mut tmp = self.temp_file(dir).map_err(write_err)?;
        tmp.write_all(&data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        self.persist(tmp)?;
        debug!(
            path = %self.path.display(),
            records = envelope.len(),
            bytes = data.len(),
            "saved annotations"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ann_types::{AnnotationRecord, Mode};

    fn sample_envelope() -> StoreEnvelope {
        StoreEnvelope {
            plan_execution_id: "E1".into(),
            annotations: vec![
                AnnotationRecord {
                    context_name: "build".into(),
                    timestamp: "2026-01-01T00:00:00Z".into(),
                    style: "info".into(),
                    summary: "Hello\nWorld".into(),
                    summary_source_path: "summary.md".into(),
                    priority: 5,
                    mode: Some(Mode::Append),
                },
                AnnotationRecord {
                    context_name: "deploy".into(),
                    timestamp: "2026-01-01T00:00:01Z".into(),
                    style: String::new(),
                    summary: String::new(),
                    summary_source_path: String::new(),
                    priority: -1,
                    mode: Some(Mode::Delete),
                },
            ],
        }
    }

    fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "tmp"))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEnvelopeStore::new(dir.path().join("annotations.json"));
        let env = store.load().unwrap();
        assert_eq!(env, StoreEnvelope::new());
    }

    #[test]
    fn zero_byte_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");
        fs::write(&path, b"").unwrap();
        let env = FileEnvelopeStore::new(&path).load().unwrap();
        assert!(env.is_empty());
        assert!(!env.has_execution_id());
    }

    #[test]
    fn corrupt_file_is_rejected_and_left_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileEnvelopeStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");
        fs::write(&path, r#"{"annotations": {"build": 1}}"#).unwrap();
        let err = FileEnvelopeStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn reading_a_directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileEnvelopeStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn loads_file_written_by_other_tools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");
        fs::write(
            &path,
            r#"{
  "planExecutionId": "abc",
  "annotations": [
    {
      "context_name": "build",
      "timestamp": "2026-01-01T00:00:00+02:00",
      "style": "success",
      "summary": "ok",
      "summary_file": "s.md",
      "priority": 2
    }
  ]
}"#,
        )
        .unwrap();
        let env = FileEnvelopeStore::new(&path).load().unwrap();
        assert_eq!(env.plan_execution_id, "abc");
        let record = env.find("build").unwrap();
        assert_eq!(record.summary_source_path, "s.md");
        assert_eq!(record.mode, None);
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEnvelopeStore::new(dir.path().join("annotations.json"));
        let env = sample_envelope();
        store.save(&env).unwrap();
        assert_eq!(store.load().unwrap(), env);
    }

    #[test]
    fn save_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEnvelopeStore::new(dir.path().join("annotations.json"));
        store.save(&sample_envelope()).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("{\n  \"planExecutionId\": \"E1\""));
        assert!(text.contains("\n      \"summary_file\": \"summary.md\""));
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/annotations.json");
        let store = FileEnvelopeStore::new(&path);
        store.save(&sample_envelope()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEnvelopeStore::new(dir.path().join("annotations.json"));
        store.save(&StoreEnvelope::new()).unwrap();
        store.save(&sample_envelope()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn parent_that_is_a_file_fails_directory_create() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let store = FileEnvelopeStore::new(blocker.join("sub/annotations.json"));
        let err = store.save(&sample_envelope()).unwrap_err();
        assert!(matches!(err, StoreError::DirectoryCreate { .. }));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
    }

    #[test]
    fn rename_onto_directory_fails_persist_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("annotations.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "kept").unwrap();

        let err = FileEnvelopeStore::new(&target)
            .save(&sample_envelope())
            .unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
        assert_eq!(fs::read_to_string(target.join("keep")).unwrap(), "kept");
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn default_path_is_annotations_json() {
        let store = FileEnvelopeStore::default();
        assert_eq!(store.path(), Path::new("annotations.json"));
        assert!(store.parent_dir().is_none());
    }
}
