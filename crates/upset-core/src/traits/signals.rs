//! External confidence signals. Both are optional; absence means neutral.

use std::sync::Arc;

use crate::models::MatchContext;

/// Historical backtest accuracy of the engine, in `[0, 1]`.
pub trait IHistoricalAccuracy: Send + Sync {
    fn historical_accuracy(&self) -> Option<f64>;
}

/// Odds-market view of the match.
pub trait IMarketSignal: Send + Sync {
    /// Market-implied probability that the underdog avoids defeat, in `[0, 1]`.
    fn implied_upset_probability(&self, ctx: &MatchContext) -> Option<f64>;
}

impl<T: IHistoricalAccuracy + ?Sized> IHistoricalAccuracy for Arc<T> {
    fn historical_accuracy(&self) -> Option<f64> {
        (**self).historical_accuracy()
    }
}

impl<T: IMarketSignal + ?Sized> IMarketSignal for Arc<T> {
    fn implied_upset_probability(&self, ctx: &MatchContext) -> Option<f64> {
        (**self).implied_upset_probability(ctx)
    }
}
