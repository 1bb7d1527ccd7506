//! FactorCatalog: the explicit, injected registry of factor definitions.

pub mod defaults;

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::info;

use upset_core::errors::{EngineError, EngineResult};
use upset_core::models::{FactorDefinition, Side};

/// Immutable set of factor definitions for both sides. Shared read-only
/// across in-flight predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorCatalog {
    definitions: Vec<FactorDefinition>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    factors: Vec<FactorDefinition>,
}

impl FactorCatalog {
    /// Build a catalog, rejecting duplicate codes, degenerate normalization
    /// ranges, and negative or non-finite weights.
    pub fn new(definitions: Vec<FactorDefinition>) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.code.trim().is_empty() {
                return Err(EngineError::Config(format!(
                    "factor '{}' has an empty code",
                    def.name
                )));
            }
            if !seen.insert(def.code.as_str()) {
                return Err(EngineError::Config(format!(
                    "duplicate factor code {}",
                    def.code
                )));
            }
            def.normalization
                .validate()
                .map_err(|reason| EngineError::Config(format!("factor {}: {reason}", def.code)))?;
            if !def.default_weight.is_finite() || def.default_weight < 0.0 {
                return Err(EngineError::Config(format!(
                    "factor {}: weight {} must be a non-negative number",
                    def.code, def.default_weight
                )));
            }
        }
        Ok(Self { definitions })
    }

    /// A catalog with no factors. Every side score falls back to neutral.
    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// The shipped A01–A08 / B01–B08 catalog.
    pub fn builtin() -> Self {
        Self {
            definitions: defaults::builtin_factors(),
        }
    }

    /// Load `[[factors]]` entries from TOML.
    pub fn from_toml(toml_str: &str) -> EngineResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| EngineError::Config(format!("factor catalog: {e}")))?;
        let catalog = Self::new(file.factors)?;
        info!(
            factors = catalog.definitions.len(),
            active = catalog.active_count(),
            "Factor catalog loaded"
        );
        Ok(catalog)
    }

    pub fn definitions(&self) -> &[FactorDefinition] {
        &self.definitions
    }

    pub fn get(&self, code: &str) -> Option<&FactorDefinition> {
        self.definitions.iter().find(|d| d.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Active definitions for one side, in catalog order.
    pub fn active(&self, side: Side) -> impl Iterator<Item = &FactorDefinition> {
        self.definitions
            .iter()
            .filter(move |d| d.active && d.side == side)
    }

    /// Active definitions across both sides. Denominator of `data_quality`.
    pub fn active_count(&self) -> usize {
        self.definitions.iter().filter(|d| d.active).count()
    }

    /// A copy with the given weights replacing defaults. Unknown codes are ignored.
    pub fn with_weights(&self, weights: &HashMap<String, f64>) -> EngineResult<Self> {
        let definitions = self
            .definitions
            .iter()
            .map(|d| {
                let mut def = d.clone();
                if let Some(w) = weights.get(&d.code) {
                    def.default_weight = *w;
                }
                def
            })
            .collect();
        Self::new(definitions)
    }
}

impl Default for FactorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
