//! Rate calculations shared by the batting and bowling aggregators.
//!
//! Every rate with a possible zero denominator returns `Option<f64>`; callers
//! never see `NaN`, infinity or a stand-in zero.

use crate::overs::Overs;

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Stateless collection of cricket rate formulas.
pub struct RateCalculator;

impl RateCalculator {
    /// Runs per dismissal.
    pub fn batting_average(runs: u32, dismissals: u32) -> Option<f64> {
        ratio(f64::from(runs), f64::from(dismissals))
    }

    /// Runs per hundred balls faced, `0.0` when no balls were faced.
    pub fn batting_strike_rate(runs: u32, balls: u32) -> f64 {
        ratio(f64::from(runs), f64::from(balls)).map_or(0.0, |r| r * 100.0)
    }

    /// Runs conceded per wicket.
    pub fn bowling_average(runs_conceded: u32, wickets: u32) -> Option<f64> {
        ratio(f64::from(runs_conceded), f64::from(wickets))
    }

    /// Runs conceded per six-ball over.
    pub fn economy(runs_conceded: u32, bowled: Overs) -> Option<f64> {
        ratio(f64::from(runs_conceded), bowled.as_fractional_overs())
    }

    /// Balls bowled per wicket.
    pub fn bowling_strike_rate(bowled: Overs, wickets: u32) -> Option<f64> {
        ratio(f64::from(bowled.balls()), f64::from(wickets))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
