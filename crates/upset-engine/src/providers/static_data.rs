//! StaticDataProvider: measurements for one fixture, keyed by factor code.

use std::collections::HashMap;
use std::time::Duration;

use upset_core::models::{MatchContext, RawValue};
use upset_core::traits::IDataProvider;

#[derive(Debug, Clone, Default)]
pub struct StaticDataProvider {
    measurements: HashMap<String, RawValue>,
    /// Artificial latency per code, for exercising provider timeouts.
    delays: HashMap<String, Duration>,
}

impl StaticDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_measurements(measurements: HashMap<String, RawValue>) -> Self {
        Self {
            measurements,
            delays: HashMap::new(),
        }
    }

    pub fn with(mut self, code: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.measurements.insert(code.into(), value.into());
        self
    }

    pub fn with_delay(mut self, code: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(code.into(), delay);
        self
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

impl IDataProvider for StaticDataProvider {
    async fn get_measurement(&self, factor_code: &str, _ctx: &MatchContext) -> Option<RawValue> {
        if let Some(delay) = self.delays.get(factor_code) {
            tokio::time::sleep(*delay).await;
        }
        self.measurements.get(factor_code).copied()
    }
}
