//! Content fingerprint of a prediction's inputs (blake3).

use upset_core::models::{FactorObservation, MatchContext, TriggeredPattern};

/// Digest of the match, every observed value and every triggered pattern.
/// Floats are hashed by bit pattern so equal inputs give equal digests.
pub fn prediction_fingerprint(
    ctx: &MatchContext,
    observations: &[&FactorObservation],
    triggered: &[TriggeredPattern],
) -> String {
    let mut hasher = blake3::Hasher::new();
    for id in [&ctx.home.id, &ctx.away.id, &ctx.favorite.id, &ctx.underdog.id] {
        hasher.update(id.as_bytes());
        hasher.update(&[0]);
    }
    for obs in observations {
        hasher.update(obs.code.as_bytes());
        hasher.update(&obs.normalized_value.to_bits().to_le_bytes());
        hasher.update(&obs.weight.to_bits().to_le_bytes());
    }
    hasher.update(&[0xff]);
    for pattern in triggered {
        hasher.update(pattern.name.as_bytes());
        hasher.update(&pattern.multiplier.to_bits().to_le_bytes());
        hasher.update(&pattern.confidence.to_bits().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use upset_core::models::{Side, TeamInfo};

    fn ctx(fav: &str, dog: &str) -> MatchContext {
        MatchContext::new(
            TeamInfo::new("arsenal", "Arsenal"),
            TeamInfo::new("man-city", "Man City"),
            fav,
            dog,
        )
        .unwrap()
    }

    #[test]
    fn stable_for_identical_inputs_and_sensitive_to_roles() {
        let obs = FactorObservation {
            code: "A05".into(),
            name: "Bad form".into(),
            side: Side::A,
            normalized_value: 0.4,
            raw_value: 9.0,
            weight: 1.0,
            contributed_to_upset: false,
        };
        let a = prediction_fingerprint(&ctx("arsenal", "man-city"), &[&obs], &[]);
        let b = prediction_fingerprint(&ctx("arsenal", "man-city"), &[&obs], &[]);
        let c = prediction_fingerprint(&ctx("man-city", "arsenal"), &[&obs], &[]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
