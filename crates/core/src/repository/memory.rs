use crate::agronomy::soil_derivation::PointScale;
use crate::core_types::SampleId;
use crate::repository::{RepositoryError, SampleRepository};
use crate::sample::{NewSample, SampleUpdate, SoilSample};
use chrono::Utc;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Plain sample table shared by the in-memory and file-backed stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct SampleTable {
    pub(crate) next_id: u64,
    pub(crate) samples: Vec<SoilSample>,
}

impl SampleTable {
    /// Index the table, checking what the file format cannot express.
    pub(crate) fn into_map(self) -> Result<(u64, FxHashMap<SampleId, SoilSample>), RepositoryError> {
        let mut next_id = self.next_id.max(1);
        let mut map = FxHashMap::default();
        for s in self.samples {
            let expected = PointScale::for_temperature(s.temperature);
            if s.point_scale != expected {
                return Err(RepositoryError::Parse(format!(
                    "sample {} has point scale {} but temperature {} gives {}",
                    s.id,
                    s.point_scale.value(),
                    s.temperature,
                    expected.value()
                )));
            }
            let after = s.id.0.checked_add(1).ok_or_else(|| {
                RepositoryError::Parse(format!("sample id {} leaves no room for new ids", s.id))
            })?;
            next_id = next_id.max(after);
            if map.insert(s.id, s).is_some() {
                return Err(RepositoryError::Parse("duplicate sample id".to_string()));
            }
        }
        Ok((next_id, map))
    }
}

#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) next_id: u64,
    pub(crate) samples: FxHashMap<SampleId, SoilSample>,
}

impl Inner {
    pub(crate) fn from_table(table: SampleTable) -> Result<Self, RepositoryError> {
        let (next_id, samples) = table.into_map()?;
        Ok(Self { next_id, samples })
    }

    pub(crate) fn to_table(&self) -> SampleTable {
        SampleTable {
            next_id: self.next_id,
            samples: self.sorted(),
        }
    }

    pub(crate) fn create(&mut self, sample: NewSample) -> Result<SampleId, RepositoryError> {
        let id = SampleId(self.next_id.max(1));
        self.next_id = id.0.checked_add(1).ok_or(RepositoryError::IdsExhausted)?;
        self.samples.insert(id, sample.into_sample(id, Utc::now()));
        Ok(id)
    }

    pub(crate) fn update(&mut self, id: SampleId, update: &SampleUpdate) -> Result<(), RepositoryError> {
        let sample = self
            .samples
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        sample.apply(update);
        Ok(())
    }

    pub(crate) fn delete(&mut self, id: SampleId) -> Result<SoilSample, RepositoryError> {
        self.samples.remove(&id).ok_or(RepositoryError::NotFound(id))
    }

    pub(crate) fn get(&self, id: SampleId) -> Result<SoilSample, RepositoryError> {
        self.samples
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    pub(crate) fn sorted(&self) -> Vec<SoilSample> {
        let mut all: Vec<SoilSample> = self.samples.values().cloned().collect();
        all.sort_by_key(|s| s.id);
        all
    }
}

/// Thread-safe in-memory sample store
#[derive(Debug)]
pub struct InMemoryRepository {
    inner: RwLock<Inner>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Create an empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                samples: FxHashMap::default(),
            }),
        }
    }

    /// Create a store pre-populated with existing samples.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Parse`] if ids repeat, an id is `u64::MAX`,
    /// or a point scale disagrees with its temperature.
    pub fn with_samples(samples: Vec<SoilSample>) -> Result<Self, RepositoryError> {
        Ok(Self {
            inner: RwLock::new(Inner::from_table(SampleTable {
                next_id: 1,
                samples,
            })?),
        })
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.samples.len())
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SampleRepository for InMemoryRepository {
    fn create(&self, sample: NewSample) -> Result<SampleId, RepositoryError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        inner.create(sample)
    }

    fn update(&self, id: SampleId, update: &SampleUpdate) -> Result<(), RepositoryError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        inner.update(id, update)
    }

    fn delete(&self, id: SampleId) -> Result<(), RepositoryError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        inner.delete(id).map(|_| ())
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
    use crate::core_types::{Municipality, Ph};
    use crate::sample::fixtures::{self, sample};

    fn new_sample(t: f64) -> NewSample {
        fixtures::new_sample("u1", Municipality::Bucay, t)
    }

    #[test]
    fn test_ids_are_sequential_and_listing_sorted() {
        let repo = InMemoryRepository::new();
        let a = repo.create(new_sample(20.0)).unwrap();
        let b = repo.create(new_sample(27.0)).unwrap();
        assert_eq!(a, SampleId(1));
        assert_eq!(b, SampleId(2));

        let all = repo.list_all().unwrap();
        assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_update_and_delete() {
        let repo = InMemoryRepository::new();
        let id = repo.create(new_sample(20.0)).unwrap();

        let update = SampleUpdate {
            ph: Some(Ph::try_new(7.1).unwrap()),
            ..SampleUpdate::default()
        };
        repo.update(id, &update).unwrap();
        assert_eq!(*repo.get(id).unwrap().ph, 7.1);

        repo.delete(id).unwrap();
        assert!(repo.is_empty());
        assert!(matches!(repo.delete(id), Err(RepositoryError::NotFound(x)) if x == id));
        assert!(matches!(
            repo.update(id, &update),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let repo = InMemoryRepository::new();
        let a = repo.create(new_sample(20.0)).unwrap();
        repo.delete(a).unwrap();
        let b = repo.create(new_sample(20.0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_with_samples_continues_numbering() {
        let repo =
            InMemoryRepository::with_samples(vec![sample(7, "u1", Municipality::Bucay, 22.0)])
                .unwrap();
        let id = repo.create(new_sample(22.0)).unwrap();
        assert_eq!(id, SampleId(8));
    }

    #[test]
    fn test_last_id_is_usable_then_exhausted() {
        let repo = InMemoryRepository::with_samples(vec![sample(
            u64::MAX - 1,
            "u1",
            Municipality::Bucay,
            22.0,
        )])
        .unwrap();
        assert_eq!(repo.create(new_sample(22.0)).unwrap(), SampleId(u64::MAX));
        assert!(matches!(
            repo.create(new_sample(22.0)),
            Err(RepositoryError::IdsExhausted)
        ));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_rejects_max_id_and_duplicates() {
        let max = InMemoryRepository::with_samples(vec![sample(
            u64::MAX,
            "u1",
            Municipality::Bucay,
            22.0,
        )]);
        assert!(matches!(max, Err(RepositoryError::Parse(_))));

        let dup = InMemoryRepository::with_samples(vec![
            sample(3, "u1", Municipality::Bucay, 22.0),
            sample(3, "u2", Municipality::Bucay, 27.0),
        ]);
        assert!(matches!(dup, Err(RepositoryError::Parse(_))));
    }

    #[test]
    fn test_rejects_point_scale_that_disagrees_with_temperature() {
        let mut s = sample(1, "u1", Municipality::Bucay, 22.0);
        s.point_scale = PointScale::try_from(1).unwrap();
        let err = InMemoryRepository::with_samples(vec![s]).unwrap_err();
        assert!(err.to_string().contains("point scale 1"));
    }
}
