//! One evaluation rule per `InteractionType` variant.

use upset_core::models::InteractionType;

/// Whether a pattern of the given type activates for normalized values `a`, `b`.
pub fn evaluate(
    interaction: InteractionType,
    a: f64,
    b: f64,
    threshold_value: f64,
    activation_threshold: f64,
) -> bool {
    match interaction {
        InteractionType::Multiplicative => multiplicative(a, b, activation_threshold),
        InteractionType::Threshold => threshold(a, b, threshold_value),
        InteractionType::Inverse => inverse(a, b, activation_threshold),
    }
}

/// Both factors high.
fn multiplicative(a: f64, b: f64, activation: f64) -> bool {
    a > activation && b > activation
}

/// Either factor above the pattern's own threshold.
fn threshold(a: f64, b: f64, threshold_value: f64) -> bool {
    a > threshold_value || b > threshold_value
}

/// One high, the other low. A value sitting exactly on the line is neither.
fn inverse(a: f64, b: f64, activation: f64) -> bool {
    (a > activation && b < activation) || (a < activation && b > activation)
}
