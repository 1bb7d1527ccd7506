//! Key insight: a deterministic one-line justification for a prediction.

use std::cmp::Ordering;

use upset_core::models::{ConfidenceLevel, FactorObservation, MatchContext, Side, TriggeredPattern};

/// Below this the upset is called unlikely regardless of the alert threshold.
const UNLIKELY_BELOW: f64 = 0.35;

/// Compose the insight sentence.
///
/// Names the upset band, the strongest contributing factors (by
/// `weight × normalized_value`, ties broken by code), and triggered patterns.
pub fn compose_key_insight(
    ctx: &MatchContext,
    final_upset_prob: f64,
    alert_threshold: f64,
    level: ConfidenceLevel,
    observations: &[&FactorObservation],
    triggered: &[TriggeredPattern],
    max_factors: usize,
) -> String {
    let band = if final_upset_prob >= alert_threshold {
        "Upset likely"
    } else if final_upset_prob < UNLIKELY_BELOW.min(alert_threshold) {
        "Upset unlikely"
    } else {
        "Upset plausible"
    };
    let pct = (final_upset_prob * 100.0).round() as i64;
    let mut insight = format!(
        "{band} ({pct}%) for {} against {}",
        ctx.underdog.display_name, ctx.favorite.display_name
    );

    let mut drivers: Vec<&&FactorObservation> =
        observations.iter().filter(|o| o.contributed_to_upset).collect();
    drivers.sort_by(|a, b| {
        b.impact()
            .partial_cmp(&a.impact())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.code.cmp(&b.code))
    });

    let phrases: Vec<String> = drivers
        .iter()
        .take(max_factors)
        .map(|o| {
            let team = match o.side {
                Side::A => &ctx.favorite.display_name,
                Side::B => &ctx.underdog.display_name,
            };
            format!("{team} {}", o.name.to_lowercase())
        })
        .collect();

    if phrases.is_empty() {
        insight.push_str("; no factor stands out");
    } else {
        insight.push_str("; driven by ");
        insight.push_str(&join_phrases(&phrases));
    }

    if !triggered.is_empty() {
        let names: Vec<&str> = triggered.iter().map(|p| p.name.as_str()).collect();
        insight.push_str(&format!("; interactions: {}", names.join(", ")));
    }

    if level == ConfidenceLevel::Low {
        insight.push_str(" (low confidence)");
    }
    insight.push('.');
    insight
}

fn join_phrases(phrases: &[String]) -> String {
    match phrases {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
