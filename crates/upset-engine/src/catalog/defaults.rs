//! Shipped factor and pattern definitions.
//!
//! Side A (favorite weakness): A01–A08. Side B (underdog strength): B01–B08.

use upset_core::models::{
    FactorDefinition, InteractionType, Normalization, Side, ThirdKnowledgePattern,
};

pub fn builtin_factors() -> Vec<FactorDefinition> {
    use Normalization::*;
    use Side::*;

    vec![
        // Missing first-choice players.
        FactorDefinition::new("A01", "Key player injuries", A, Linear { min: 0.0, max: 5.0 }, 1.2),
        // Days since last match; fewer days = more congestion.
        FactorDefinition::new("A02", "Fixture congestion", A, Inverse { min: 2.0, max: 7.0 }, 0.8),
        // Kilometres travelled to the venue.
        FactorDefinition::new("A03", "Travel fatigue", A, Linear { min: 0.0, max: 3000.0 }, 0.5),
        // Goals conceded per game, last five.
        FactorDefinition::new("A04", "Defensive instability", A, Linear { min: 0.0, max: 3.0 }, 1.0),
        // Points from the last five; fewer points = worse form.
        FactorDefinition::new("A05", "Bad form", A, Inverse { min: 0.0, max: 15.0 }, 1.0),
        FactorDefinition::new("A06", "Manager under pressure", A, Boolean, 0.6),
        FactorDefinition::new("A07", "Nothing to play for", A, Boolean, 0.7),
        // Expected share of starters rested.
        FactorDefinition::new("A08", "Squad rotation", A, Identity, 0.6),
        // Points from the last five.
        FactorDefinition::new("B01", "Recent form", B, Linear { min: 0.0, max: 15.0 }, 1.0),
        // Home non-loss rate this season.
        FactorDefinition::new("B02", "Home fortress", B, Identity, 0.9),
        FactorDefinition::new("B03", "Set-piece threat", B, Identity, 0.6),
        // Goals conceded per game, last five; fewer = more solid.
        FactorDefinition::new("B04", "Defensive solidity", B, Inverse { min: 0.0, max: 3.0 }, 0.9),
        FactorDefinition::new("B05", "New manager bounce", B, Boolean, 0.5),
        FactorDefinition::new("B06", "Survival motivation", B, Boolean, 0.8),
        // Share of recent meetings the underdog did not lose.
        FactorDefinition::new("B07", "Head-to-head record", B, Identity, 0.7),
        FactorDefinition::new("B08", "Pressing intensity", B, Identity, 0.6),
    ]
}

pub fn builtin_patterns() -> Vec<ThirdKnowledgePattern> {
    use InteractionType::*;

    vec![
        ThirdKnowledgePattern::new("complacency_trap", "A07", "B01", Inverse, 1.08, 0.5),
        ThirdKnowledgePattern::new("derby_caution", "A05", "B02", Multiplicative, 1.15, 0.7),
        ThirdKnowledgePattern::new("fatigue_vs_pressing", "A02", "B08", Multiplicative, 1.2, 0.65),
        ThirdKnowledgePattern::new("fortress_under_pressure", "A06", "B02", Threshold, 1.1, 0.55)
            .with_threshold(0.8),
        ThirdKnowledgePattern::new("leaky_defence_set_pieces", "A04", "B03", Multiplicative, 1.12, 0.7),
        ThirdKnowledgePattern::new("new_manager_spark", "A05", "B05", Threshold, 1.1, 0.5)
            .with_threshold(0.9),
        ThirdKnowledgePattern::new("rotation_against_motivation", "A08", "B06", Multiplicative, 1.18, 0.6),
    ]
}
