//! IPatternRepository: long-lived store of Third Knowledge patterns.

use std::future::Future;
use std::sync::Arc;

use crate::errors::EngineResult;
use crate::models::{PatternOutcomeDelta, ThirdKnowledgePattern};

/// Owns pattern definitions and their track record.
///
/// `update_pattern` must be atomic per name: the read-modify-write of one
/// pattern can never interleave with another update of the same name.
pub trait IPatternRepository: Send + Sync {
    /// Active patterns, ordered by name.
    fn list_active_patterns(
        &self,
    ) -> impl Future<Output = EngineResult<Vec<ThirdKnowledgePattern>>> + Send;

    fn get_pattern(
        &self,
        name: &str,
    ) -> impl Future<Output = EngineResult<Option<ThirdKnowledgePattern>>> + Send;

    /// Insert or replace a pattern definition.
    fn upsert_pattern(
        &self,
        pattern: ThirdKnowledgePattern,
    ) -> impl Future<Output = EngineResult<()>> + Send;

    /// Apply one outcome to the named pattern and return the updated record.
    fn update_pattern(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> impl Future<Output = EngineResult<ThirdKnowledgePattern>> + Send;
}

impl<T: IPatternRepository + ?Sized> IPatternRepository for Arc<T> {
    fn list_active_patterns(
        &self,
    ) -> impl Future<Output = EngineResult<Vec<ThirdKnowledgePattern>>> + Send {
        (**self).list_active_patterns()
    }

    fn get_pattern(
        &self,
        name: &str,
    ) -> impl Future<Output = EngineResult<Option<ThirdKnowledgePattern>>> + Send {
        (**self).get_pattern(name)
    }

    fn upsert_pattern(
        &self,
        pattern: ThirdKnowledgePattern,
    ) -> impl Future<Output = EngineResult<()>> + Send {
        (**self).upsert_pattern(pattern)
    }

    fn update_pattern(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> impl Future<Output = EngineResult<ThirdKnowledgePattern>> + Send {
        (**self).update_pattern(name, delta)
    }
}
