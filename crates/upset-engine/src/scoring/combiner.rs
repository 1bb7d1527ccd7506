//! ScoreCombiner: side scores + interaction boost → final upset probability.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedScore {
    pub naive_upset_prob: f64,
    pub interaction_boost: f64,
    pub final_upset_prob: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCombiner;

impl ScoreCombiner {
    pub fn new() -> Self {
        Self
    }

    /// `naive = (a + b) / 2`, `final = clamp(naive × (1 + boost), 0, 1)`.
    /// The final probability is always clamped, whatever the boost.
    pub fn combine(&self, side_a_score: f64, side_b_score: f64, interaction_boost: f64) -> CombinedScore {
        let naive_upset_prob = ((side_a_score + side_b_score) / 2.0).clamp(0.0, 1.0);
        // An overflowing boost saturates; NaN carries no signal.
        let boost = if interaction_boost.is_nan() {
            0.0
        } else {
            interaction_boost.clamp(0.0, f64::MAX)
        };
        let final_upset_prob = (naive_upset_prob * (1.0 + boost)).clamp(0.0, 1.0);
        CombinedScore {
            naive_upset_prob,
            interaction_boost: boost,
            final_upset_prob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_boost_keeps_naive() {
        let c = ScoreCombiner::new().combine(0.4, 1.0, 0.0);
        assert!((c.naive_upset_prob - 0.7).abs() < 1e-12);
        assert_eq!(c.final_upset_prob, c.naive_upset_prob);
    }

    #[test]
    fn boost_scales_naive() {
        let c = ScoreCombiner::new().combine(0.6, 0.6, 0.12);
        assert!((c.final_upset_prob - 0.672).abs() < 1e-9);
    }

    #[test]
    fn final_is_clamped() {
        let c = ScoreCombiner::new().combine(0.9, 0.95, 4.0);
        assert_eq!(c.final_upset_prob, 1.0);
        assert!((c.interaction_boost - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overflowing_boost_saturates() {
        let c = ScoreCombiner::new().combine(0.6, 0.6, f64::INFINITY);
        assert_eq!(c.final_upset_prob, 1.0);
        assert_eq!(c.interaction_boost, f64::MAX);

        let none = ScoreCombiner::new().combine(0.0, 0.0, f64::INFINITY);
        assert_eq!(none.final_upset_prob, 0.0);

        let nan = ScoreCombiner::new().combine(0.6, 0.6, f64::NAN);
        assert_eq!(nan.interaction_boost, 0.0);
        assert!((nan.final_upset_prob - 0.6).abs() < 1e-12);
    }
}
