//! Odds-market signal: decimal 1X2 odds → implied upset probability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use upset_core::models::{MatchContext, Venue};
use upset_core::traits::IMarketSignal;

/// Decimal odds for home win, draw, away win.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Invert decimal odds and remove the bookmaker margin so the three
/// probabilities sum to 1. `None` unless every price is finite and above 1.0.
pub fn implied_probabilities(odds: &MatchOdds) -> Option<ImpliedProbabilities> {
    let prices = [odds.home, odds.draw, odds.away];
    if prices.iter().any(|p| !p.is_finite() || *p <= 1.0) {
        return None;
    }
    let raw = prices.map(|p| 1.0 / p);
    let overround: f64 = raw.iter().sum();
    Some(ImpliedProbabilities {
        home: raw[0] / overround,
        draw: raw[1] / overround,
        away: raw[2] / overround,
    })
}

/// Odds keyed by `(home_id, away_id)`.
#[derive(Debug, Clone, Default)]
pub struct StaticMarketSignal {
    odds: HashMap<(String, String), MatchOdds>,
}

impl StaticMarketSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_odds(mut self, home_id: impl Into<String>, away_id: impl Into<String>, odds: MatchOdds) -> Self {
        self.odds.insert((home_id.into(), away_id.into()), odds);
        self
    }
}

impl IMarketSignal for StaticMarketSignal {
    fn implied_upset_probability(&self, ctx: &MatchContext) -> Option<f64> {
        let odds = self.odds.get(&(ctx.home.id.clone(), ctx.away.id.clone()))?;
        let p = implied_probabilities(odds)?;
        let favorite_wins = match ctx.favorite_venue() {
            Venue::Home => p.home,
            Venue::Away => p.away,
        };
        Some((1.0 - favorite_wins).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upset_core::models::TeamInfo;

    #[test]
    fn margin_is_removed() {
        let p = implied_probabilities(&MatchOdds {
            home: 1.8,
            draw: 3.6,
            away: 4.5,
        })
        .unwrap();
        assert!((p.home + p.draw + p.away - 1.0).abs() < 1e-12);
        assert!(p.home > p.away);
    }

    #[test]
    fn invalid_prices_rejected() {
        assert!(implied_probabilities(&MatchOdds {
            home: 1.0,
            draw: 3.0,
            away: 4.0
        })
        .is_none());
        assert!(implied_probabilities(&MatchOdds {
            home: f64::NAN,
            draw: 3.0,
            away: 4.0
        })
        .is_none());
    }

    #[test]
    fn upset_is_favorite_not_winning() {
        let ctx = MatchContext::new(
            TeamInfo::new("arsenal", "Arsenal"),
            TeamInfo::new("man-city", "Man City"),
            "man-city",
            "arsenal",
        )
        .unwrap();
        let signal = StaticMarketSignal::new().with_odds(
            "arsenal",
            "man-city",
            MatchOdds {
                home: 4.0,
                draw: 4.0,
                away: 2.0,
            },
        );
        // Raw 0.25 / 0.25 / 0.5 already sums to 1.
        let upset = signal.implied_upset_probability(&ctx).unwrap();
        assert!((upset - 0.5).abs() < 1e-12);
    }
}
