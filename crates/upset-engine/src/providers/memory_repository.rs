//! InMemoryPatternRepository: DashMap-backed pattern store.

use dashmap::DashMap;

use upset_core::errors::{EngineError, EngineResult};
use upset_core::models::{PatternOutcomeDelta, ThirdKnowledgePattern};
use upset_core::traits::IPatternRepository;

use crate::catalog::defaults::builtin_patterns;

/// Updates hold the entry's shard lock for the whole read-modify-write, so
/// two updates of one name can never interleave.
#[derive(Debug, Default)]
pub struct InMemoryPatternRepository {
    patterns: DashMap<String, ThirdKnowledgePattern>,
}

impl InMemoryPatternRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with the shipped Third Knowledge patterns.
    pub fn builtin() -> Self {
        Self::with_patterns(builtin_patterns())
    }

    pub fn with_patterns(patterns: impl IntoIterator<Item = ThirdKnowledgePattern>) -> Self {
        let repo = Self::new();
        for pattern in patterns {
            repo.patterns.insert(pattern.name.clone(), pattern);
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl IPatternRepository for InMemoryPatternRepository {
    async fn list_active_patterns(&self) -> EngineResult<Vec<ThirdKnowledgePattern>> {
        let mut active: Vec<ThirdKnowledgePattern> = self
            .patterns
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.value().clone())
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn get_pattern(&self, name: &str) -> EngineResult<Option<ThirdKnowledgePattern>> {
        Ok(self.patterns.get(name).map(|entry| entry.value().clone()))
    }

    async fn upsert_pattern(&self, pattern: ThirdKnowledgePattern) -> EngineResult<()> {
        self.patterns.insert(pattern.name.clone(), pattern);
        Ok(())
    }

    async fn update_pattern(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> EngineResult<ThirdKnowledgePattern> {
        match self.patterns.get_mut(name) {
            Some(mut entry) => {
                entry.apply_outcome(delta);
                Ok(entry.value().clone())
            }
            None => Err(EngineError::PatternNotFound {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upset_core::models::InteractionType;

    fn delta(correct: bool) -> PatternOutcomeDelta {
        PatternOutcomeDelta {
            prediction_correct: correct,
            confidence_learning_rate: 0.1,
            confidence_floor: 0.05,
            min_samples_for_validation: 10,
        }
    }

    #[tokio::test]
    async fn lists_active_patterns_by_name() {
        let mut dormant =
            ThirdKnowledgePattern::new("aaa_dormant", "A01", "B01", InteractionType::Inverse, 1.1, 0.5);
        dormant.active = false;
        let repo = InMemoryPatternRepository::builtin();
        repo.upsert_pattern(dormant).await.unwrap();

        let names: Vec<_> = repo
            .list_active_patterns()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("complacency_trap"));
        assert!(!names.iter().any(|n| n == "aaa_dormant"));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn update_applies_outcome() {
        let repo = InMemoryPatternRepository::builtin();
        let updated = repo.update_pattern("derby_caution", &delta(true)).await.unwrap();
        assert_eq!(updated.sample_size, 1);
        assert_eq!(updated.success_rate, Some(1.0));
        let stored = repo.get_pattern("derby_caution").await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_unknown_pattern_is_not_found() {
        let repo = InMemoryPatternRepository::new();
        assert!(matches!(
            repo.update_pattern("ghost", &delta(false)).await,
            Err(EngineError::PatternNotFound { .. })
        ));
    }
}
