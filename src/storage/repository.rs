use super::codec;
use super::{matter_key, StorageLayout, StoragePort, MATTER_KEY_PREFIX, SHARED_LIST_KEY};
use crate::assessment::Assessment;
use crate::error::{Result, RiskMatrixError};

/// Saves and loads assessments by matter name over any [`StoragePort`].
pub struct AssessmentRepository<S: StoragePort> {
    store: S,
    layout: StorageLayout,
}

impl<S: StoragePort> AssessmentRepository<S> {
    pub fn new(store: S, layout: StorageLayout) -> Self {
        Self { store, layout }
    }

    pub fn layout(&self) -> StorageLayout {
        self.layout
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save, replacing any existing record with the same matter name.
    pub fn save(&self, assessment: &Assessment) -> Result<()> {
        match self.layout {
            StorageLayout::PerMatter => {
                let key = matter_key(assessment.matter_name());
                self.store.set(&key, &codec::serialize(assessment)?)?;
            }
            StorageLayout::SharedList => {
                let mut all = self.read_list()?;
                all.retain(|a| a.matter_name() != assessment.matter_name());
                all.push(assessment.clone());
                self.store.set(SHARED_LIST_KEY, &codec::serialize_list(&all)?)?;
            }
        }
        log::info!("saved assessment '{}'", assessment.matter_name());
        Ok(())
    }

    pub fn load(&self, matter_name: &str) -> Result<Assessment> {
        let matter_name = matter_name.trim();
        match self.layout {
            StorageLayout::PerMatter => {
                let key = matter_key(matter_name);
                let json = self
                    .store
                    .get(&key)?
                    .ok_or_else(|| RiskMatrixError::not_found(matter_name))?;
                codec::decode(&key, &json)
            }
            StorageLayout::SharedList => self
                .read_records()?
                .into_iter()
                .find(|record| record.name() == Some(matter_name))
                .map_or_else(
                    || Err(RiskMatrixError::not_found(matter_name)),
                    |record| record.assessment,
                ),
        }
    }

    pub fn exists(&self, matter_name: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|name| name == matter_name.trim()))
    }

    /// Stored matter names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = match self.layout {
            StorageLayout::PerMatter => self
                .store
                .keys()?
                .into_iter()
                .filter_map(|key| key.strip_prefix(MATTER_KEY_PREFIX).map(str::to_string))
                .collect(),
            StorageLayout::SharedList => self
                .read_records()?
                .iter()
                .filter_map(|record| {
                    if let Err(e) = &record.assessment {
                        log::warn!("skipping unreadable shared-list entry: {}", e);
                    }
                    record.name().map(str::to_string)
                })
                .collect(),
        };
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, matter_name: &str) -> Result<()> {
        let matter_name = matter_name.trim();
        match self.layout {
            StorageLayout::PerMatter => {
                if !self.store.remove(&matter_key(matter_name))? {
                    return Err(RiskMatrixError::not_found(matter_name));
                }
            }
            StorageLayout::SharedList => {
                let mut all = self.read_list()?;
                let before = all.len();
                all.retain(|a| a.matter_name() != matter_name);
                if all.len() == before {
                    return Err(RiskMatrixError::not_found(matter_name));
                }
                self.store.set(SHARED_LIST_KEY, &codec::serialize_list(&all)?)?;
            }
        }
        log::info!("deleted assessment '{}'", matter_name);
        Ok(())
    }

    fn read_records(&self) -> Result<Vec<codec::ListRecord>> {
        match self.store.get(SHARED_LIST_KEY)? {
            Some(json) => codec::decode_records(SHARED_LIST_KEY, &json),
            None => Ok(Vec::new()),
        }
    }

    /// The whole shared list, for rewriting. Any unreadable entry is an
    /// error so a save or delete never drops it silently.
    fn read_list(&self) -> Result<Vec<Assessment>> {
        self.read_records()?
            .into_iter()
            .map(|record| record.assessment)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::RiskFactor;
    use crate::rating::{Axis, Rating};
    use crate::storage::MemoryStore;

    fn assessment(name: &str, rating: i64) -> Assessment {
        let mut a = Assessment::new(name).unwrap();
        a.add_factor(
            Axis::Severity,
            RiskFactor::new(["Financial"], "exposure", Rating::new(rating).unwrap()).unwrap(),
        );
        a
    }

    fn repositories() -> Vec<AssessmentRepository<MemoryStore>> {
        vec![
            AssessmentRepository::new(MemoryStore::new(), StorageLayout::PerMatter),
            AssessmentRepository::new(MemoryStore::new(), StorageLayout::SharedList),
        ]
    }

    #[test]
    fn test_save_overwrites_same_name() {
        for repo in repositories() {
            repo.save(&assessment("Matter", 2)).unwrap();
            repo.save(&assessment("Matter", 5)).unwrap();
            let loaded = repo.load("Matter").unwrap();
            assert_eq!(loaded.factors(Axis::Severity)[0].rating().value(), 5);
            assert_eq!(repo.list().unwrap(), vec!["Matter"]);
        }
    }

    #[test]
    fn test_load_missing_is_not_found() {
        for repo in repositories() {
            let err = repo.load("Nobody").unwrap_err();
            assert!(matches!(err, RiskMatrixError::NotFound { ref matter } if matter == "Nobody"));
        }
    }

    #[test]
    fn test_delete() {
        for repo in repositories() {
            repo.save(&assessment("A", 1)).unwrap();
            repo.save(&assessment("B", 1)).unwrap();
            repo.delete("A").unwrap();
            assert_eq!(repo.list().unwrap(), vec!["B"]);
            assert!(matches!(
                repo.delete("A"),
                Err(RiskMatrixError::NotFound { .. })
            ));
        }
    }

    #[test]
    fn test_per_matter_key_naming() {
        let repo = AssessmentRepository::new(MemoryStore::new(), StorageLayout::PerMatter);
        repo.save(&assessment("Acme", 3)).unwrap();
        assert_eq!(repo.store().keys().unwrap(), vec!["assessment_Acme"]);
    }

    #[test]
    fn test_list_ignores_foreign_keys() {
        let store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        let repo = AssessmentRepository::new(store, StorageLayout::PerMatter);
        repo.save(&assessment("Z", 1)).unwrap();
        assert_eq!(repo.list().unwrap(), vec!["Z"]);
        assert!(repo.exists("Z").unwrap());
        assert!(!repo.exists("theme").unwrap());
    }

    #[test]
    fn test_corrupt_record_is_malformed_not_not_found() {
        let store = MemoryStore::new();
        store.set("assessment_Broken", "{\"matterName\": ").unwrap();
        let repo = AssessmentRepository::new(store, StorageLayout::PerMatter);
        let err = repo.load("Broken").unwrap_err();
        assert!(
            matches!(err, RiskMatrixError::MalformedData { ref key, .. } if key == "assessment_Broken")
        );
    }

    #[test]
    fn test_shared_list_bad_entry_leaves_others_readable() {
        let store = MemoryStore::new();
        let raw = r#"[{"matterName":"Good","likelihood":2,"impact":3},
                      {"matterName":"Bad","likelihood":9,"impact":3}]"#;
        store.set(SHARED_LIST_KEY, raw).unwrap();
        let repo = AssessmentRepository::new(store, StorageLayout::SharedList);

        assert_eq!(repo.load("Good").unwrap().ratings(Axis::Likelihood)[0].value(), 2);
        assert_eq!(repo.list().unwrap(), vec!["Bad", "Good"]);
        assert!(matches!(
            repo.load("Bad"),
            Err(RiskMatrixError::MalformedData { .. })
        ));
        assert!(matches!(
            repo.load("Missing"),
            Err(RiskMatrixError::NotFound { .. })
        ));

        assert!(matches!(
            repo.save(&assessment("New", 1)),
            Err(RiskMatrixError::MalformedData { .. })
        ));
        assert!(matches!(
            repo.delete("Good"),
            Err(RiskMatrixError::MalformedData { .. })
        ));
        assert_eq!(repo.store().get(SHARED_LIST_KEY).unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn test_shared_list_reads_legacy_single_rating_records() {
        let store = MemoryStore::new();
        store
            .set(
                SHARED_LIST_KEY,
                r#"[{"matterName":"Old","likelihood":3,"impact":4,"riskValue":12}]"#,
            )
            .unwrap();
        let repo = AssessmentRepository::new(store, StorageLayout::SharedList);
        let loaded = repo.load("Old").unwrap();
        assert_eq!(loaded.ratings(Axis::Likelihood)[0].value(), 3);
        assert_eq!(loaded.ratings(Axis::Severity)[0].value(), 4);
    }
}
