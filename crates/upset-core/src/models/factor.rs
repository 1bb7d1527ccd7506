//! Factor types: Side, Normalization, FactorDefinition, RawValue, FactorObservation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of the model a factor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Favorite weakness.
    A,
    /// Underdog strength.
    B,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "favorite weakness",
            Self::B => "underdog strength",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// A raw measurement as supplied by the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Flag(bool),
    Numeric(f64),
}

impl RawValue {
    /// Numeric view of the measurement. Flags map to 1.0 / 0.0.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Flag(true) => 1.0,
            Self::Flag(false) => 0.0,
            Self::Numeric(v) => *v,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// How a raw measurement is mapped into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Normalization {
    /// Value is already a ratio; clamp into `[0, 1]`.
    Identity,
    /// `(raw - min) / (max - min)`, clamped.
    Linear { min: f64, max: f64 },
    /// `1 - linear`: larger raw values mean less of the condition.
    Inverse { min: f64, max: f64 },
    /// Any non-zero measurement is 1.0.
    Boolean,
}

impl Normalization {
    /// Map a raw measurement into `[0, 1]`. Returns `None` for non-finite input,
    /// which callers treat exactly like a missing measurement.
    pub fn apply(&self, raw: RawValue) -> Option<f64> {
        let value = raw.as_f64();
        if !value.is_finite() {
            return None;
        }
        let normalized = match self {
            Self::Identity => value,
            Self::Linear { min, max } => (value - min) / (max - min),
            Self::Inverse { min, max } => 1.0 - (value - min) / (max - min),
            Self::Boolean => {
                if value != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        };
        normalized.is_finite().then(|| normalized.clamp(0.0, 1.0))
    }

    /// Reject degenerate ranges.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Linear { min, max } | Self::Inverse { min, max } => {
                if !min.is_finite() || !max.is_finite() || max <= min {
                    Err(format!("range [{min}, {max}] is empty or non-finite"))
                } else {
                    Ok(())
                }
            }
            Self::Identity | Self::Boolean => Ok(()),
        }
    }
}

/// Immutable catalog entry describing one measurable condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDefinition {
    /// Stable identifier, e.g. `A05`.
    pub code: String,
    pub name: String,
    pub side: Side,
    pub normalization: Normalization,
    pub default_weight: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FactorDefinition {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        side: Side,
        normalization: Normalization,
        default_weight: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            side,
            normalization,
            default_weight,
            active: true,
        }
    }

    pub fn normalize(&self, raw: RawValue) -> Option<f64> {
        self.normalization.apply(raw)
    }
}

/// One factor's contribution to a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorObservation {
    pub code: String,
    pub name: String,
    pub side: Side,
    /// Always in `[0, 1]`.
    pub normalized_value: f64,
    pub raw_value: f64,
    pub weight: f64,
    /// `normalized_value` exceeded the activation threshold.
    pub contributed_to_upset: bool,
}

impl FactorObservation {
    /// `weight × normalized_value`, used to rank factors for the key insight.
    pub fn impact(&self) -> f64 {
        self.weight * self.normalized_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_and_inverse_are_complementary() {
        let linear = Normalization::Linear { min: 0.0, max: 15.0 };
        let inverse = Normalization::Inverse { min: 0.0, max: 15.0 };
        let raw = RawValue::Numeric(6.0);
        let a = linear.apply(raw).unwrap();
        let b = inverse.apply(raw).unwrap();
        assert!((a - 0.4).abs() < 1e-12);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let linear = Normalization::Linear { min: 0.0, max: 5.0 };
        assert_eq!(linear.apply(RawValue::Numeric(12.0)), Some(1.0));
        assert_eq!(linear.apply(RawValue::Numeric(-3.0)), Some(0.0));
        assert_eq!(Normalization::Identity.apply(RawValue::Numeric(1.7)), Some(1.0));
    }

    #[test]
    fn non_finite_raw_is_missing() {
        assert_eq!(Normalization::Identity.apply(RawValue::Numeric(f64::NAN)), None);
        assert_eq!(
            Normalization::Boolean.apply(RawValue::Numeric(f64::INFINITY)),
            None
        );
    }

    #[test]
    fn boolean_accepts_flags_and_numbers() {
        assert_eq!(Normalization::Boolean.apply(RawValue::Flag(true)), Some(1.0));
        assert_eq!(Normalization::Boolean.apply(RawValue::Flag(false)), Some(0.0));
        assert_eq!(Normalization::Boolean.apply(RawValue::Numeric(2.0)), Some(1.0));
    }

    #[test]
    fn degenerate_range_rejected() {
        assert!(Normalization::Linear { min: 3.0, max: 3.0 }.validate().is_err());
        assert!(Normalization::Inverse { min: 0.0, max: 1.0 }.validate().is_ok());
    }

    #[test]
    fn normalization_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            normalization: Normalization,
        }
        let w: Wrapper =
            toml::from_str(r#"normalization = { rule = "inverse", min = 0.0, max = 15.0 }"#)
                .unwrap();
        assert_eq!(w.normalization, Normalization::Inverse { min: 0.0, max: 15.0 });
    }
}
