//! File-backed sample store
//!
//! The whole table is written as one pretty-printed JSON document after every
//! mutation. Writes go to a sibling temporary file which is then renamed over
//! the original, so a crash mid-write leaves the previous version intact.

use crate::core_types::SampleId;
use crate::repository::memory::{Inner, SampleTable};
use crate::repository::{RepositoryError, SampleRepository};
use crate::sample::{NewSample, SampleUpdate, SoilSample};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// Sample store persisted to a JSON file
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl JsonFileRepository {
    /// Open the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Io`] if the file exists but cannot be read and
    /// [`RepositoryError::Parse`] if its contents are not a valid sample table
    /// (including ids that repeat or a point scale that disagrees with its
    /// temperature).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let table = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<SampleTable>(&contents)
                .map_err(|e| RepositoryError::Parse(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => SampleTable::default(),
            Err(e) => return Err(RepositoryError::Io(e)),
        };

        info!(
            "Opened sample store at {} ({} samples)",
            path.display(),
            table.samples.len()
        );

        Ok(Self {
            path,
            inner: RwLock::new(Inner::from_table(table)?),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, inner: &Inner) -> Result<(), RepositoryError> {
        let contents = serde_json::to_string_pretty(&inner.to_table())
            .map_err(|e| RepositoryError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            "Persisted {} samples to {}",
            inner.samples.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Run a mutation under the write lock and persist on success.
    ///
    /// The in-memory table is only replaced once the file write succeeded.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Inner) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut next = Inner {
            next_id: guard.next_id,
            samples: guard.samples.clone(),
        };
        let out = op(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

impl SampleRepository for JsonFileRepository {
    fn create(&self, sample: NewSample) -> Result<SampleId, RepositoryError> {
        self.mutate(|inner| inner.create(sample))
    }

    fn update(&self, id: SampleId, update: &SampleUpdate) -> Result<(), RepositoryError> {
        self.mutate(|inner| inner.update(id, update))
    }

    fn delete(&self, id: SampleId) -> Result<(), RepositoryError> {
        self.mutate(|inner| inner.delete(id).map(|_| ()))
    }

    fn get(&self, id: SampleId) -> Result<SoilSample, RepositoryError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        inner.get(id)
    }

    fn list_all(&self) -> Result<Vec<SoilSample>, RepositoryError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner.sorted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Municipality, Percent};
    use crate::sample::fixtures::new_sample;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path().join("samples.json")).unwrap();
        assert!(repo.list_all().unwrap().is_empty());
        assert!(!repo.path().exists());
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("samples.json");

        let id = {
            let repo = JsonFileRepository::open(&path).unwrap();
            let id = repo
                .create(new_sample("u1", Municipality::Lagangilang, 29.0))
                .unwrap();
            repo.create(new_sample("u2", Municipality::Bucay, 26.0))
                .unwrap();
            repo.update(
                id,
                &SampleUpdate {
                    fertility: Some(Percent::try_new(55.0).unwrap()),
                    ..SampleUpdate::default()
                },
            )
            .unwrap();
            id
        };

        let reopened = JsonFileRepository::open(&path).unwrap();
        let all = reopened.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(*reopened.get(id).unwrap().fertility, 55.0);

        reopened.delete(id).unwrap();
        let next = reopened
            .create(new_sample("u1", Municipality::Bucay, 20.0))
            .unwrap();
        assert_eq!(next, SampleId(3));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileRepository::open(&path),
            Err(RepositoryError::Parse(_))
        ));
    }

    #[test]
    fn test_edited_point_scale_is_rejected_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.json");
        {
            let repo = JsonFileRepository::open(&path).unwrap();
            repo.create(new_sample("u1", Municipality::Bucay, 22.0))
                .unwrap();
        }
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"point_scale\": 5"));
        fs::write(&path, contents.replace("\"point_scale\": 5", "\"point_scale\": 2")).unwrap();

        assert!(matches!(
            JsonFileRepository::open(&path),
            Err(RepositoryError::Parse(msg)) if msg.contains("point scale 2")
        ));
    }

    #[test]
    fn test_max_id_on_disk_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.json");
        let mut table = SampleTable::default();
        table.samples.push(crate::sample::fixtures::sample(
            u64::MAX,
            "u1",
            Municipality::Bucay,
            22.0,
        ));
        fs::write(&path, serde_json::to_string_pretty(&table).unwrap()).unwrap();
        assert!(matches!(
            JsonFileRepository::open(&path),
            Err(RepositoryError::Parse(_))
        ));
    }

    #[test]
    fn test_failed_update_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path().join("samples.json")).unwrap();
        repo.create(new_sample("u1", Municipality::Bucay, 22.0))
            .unwrap();
        let missing = repo.update(SampleId(99), &SampleUpdate::default());
        assert!(matches!(missing, Err(RepositoryError::NotFound(SampleId(99)))));
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }
}
