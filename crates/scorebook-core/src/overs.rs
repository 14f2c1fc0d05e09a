//! Cricket overs notation.
//!
//! Bowling figures are written `overs.balls`, where the digit after the point
//! counts legal deliveries in an unfinished over (0-5). `4.3` is four overs and
//! three balls, i.e. 27 deliveries, not four and three tenths. All arithmetic
//! in this crate is done on the ball count; the notation is only parsed on the
//! way in and rendered on the way out.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, StatsError};

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Tolerance used when checking that a decimal overs value has a single
/// fractional digit.
const FRACTION_EPSILON: f64 = 1e-6;

/// A quantity of bowling measured in legal balls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Overs {
    balls: u32,
}

impl Overs {
    /// Wrap a raw ball count.
    pub const fn from_balls(balls: u32) -> Self {
        Self { balls }
    }

    /// Convert a decimal overs figure such as `4.3` into balls.
    ///
    /// `balls = floor(overs) * 6 + round(frac(overs) * 10)`. Rejects negative
    /// or non-finite values, more than one fractional digit, and a fractional
    /// digit of 6 or more.
    ///
    /// ```
    /// use scorebook_core::overs::Overs;
    ///
    /// assert_eq!(Overs::from_notation(4.3).unwrap().balls(), 27);
    /// assert_eq!(Overs::from_notation(10.0).unwrap().balls(), 60);
    /// assert!(Overs::from_notation(3.6).is_err());
    /// ```
    pub fn from_notation(overs: f64) -> Result<Self> {
        if !overs.is_finite() || overs < 0.0 {
            return Err(malformed(overs, "overs must be a non-negative number"));
        }
        let whole = overs.floor();
        if whole > f64::from(u32::MAX / BALLS_PER_OVER - 1) {
            return Err(malformed(overs, "overs value is too large"));
        }

        let tenths = (overs - whole) * 10.0;
        let digit = tenths.round();
        if (tenths - digit).abs() > FRACTION_EPSILON {
            return Err(malformed(overs, "at most one digit may follow the point"));
        }
        if digit >= f64::from(BALLS_PER_OVER) {
            return Err(malformed(overs, "balls-in-over must be 0-5"));
        }

        Ok(Self::from_balls(whole as u32 * BALLS_PER_OVER + digit as u32))
    }

    /// Total legal balls.
    pub fn balls(&self) -> u32 {
        self.balls
    }

    /// Number of completed six-ball overs.
    pub fn completed_overs(&self) -> u32 {
        self.balls / BALLS_PER_OVER
    }

    /// Balls bowled in the unfinished over (0-5).
    pub fn remainder_balls(&self) -> u32 {
        self.balls % BALLS_PER_OVER
    }

    /// Decimal rendering of the notation, e.g. `27` balls → `4.3`.
    pub fn as_notation(&self) -> f64 {
        f64::from(self.completed_overs()) + f64::from(self.remainder_balls()) / 10.0
    }

    /// Overs as a true fraction of six-ball overs (`27` balls → `4.5`), the
    /// denominator used for economy rate.
    pub fn as_fractional_overs(&self) -> f64 {
        f64::from(self.balls) / f64::from(BALLS_PER_OVER)
    }

    /// Sum of two ball counts, `None` on overflow.
    pub fn checked_add(self, rhs: Overs) -> Option<Overs> {
        self.balls.checked_add(rhs.balls).map(Overs::from_balls)
    }
}

fn malformed(overs: impl fmt::Display, reason: &str) -> StatsError {
    StatsError::MalformedOvers {
        overs: overs.to_string(),
        reason: reason.to_string(),
    }
}

fn notation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)(?:\.(\d+))?$").expect("regex is valid"))
}

impl FromStr for Overs {
    type Err = StatsError;

    /// Parse `"12"`, `"12.0"` or `"12.4"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let caps = notation_re()
            .captures(trimmed)
            .ok_or_else(|| malformed(trimmed, "expected overs.balls notation"))?;

        let overs: u32 = caps[1]
            .parse()
            .map_err(|_| malformed(trimmed, "overs value is too large"))?;
        let balls = match caps.get(2) {
            None => 0,
            Some(frac) if frac.as_str().len() == 1 => frac.as_str().parse::<u32>().unwrap_or(0),
            Some(_) => return Err(malformed(trimmed, "at most one digit may follow the point")),
        };
        if balls >= BALLS_PER_OVER {
            return Err(malformed(trimmed, "balls-in-over must be 0-5"));
        }

        overs
            .checked_mul(BALLS_PER_OVER)
            .and_then(|b| b.checked_add(balls))
            .map(Self::from_balls)
            .ok_or_else(|| malformed(trimmed, "overs value is too large"))
    }
}

impl fmt::Display for Overs {
    /// `24` balls → `"4"`, `27` balls → `"4.3"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remainder_balls() {
            0 => write!(f, "{}", self.completed_overs()),
            rem => write!(f, "{}.{}", self.completed_overs(), rem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── from_notation ─────────────────────────────────────────────────────────

    #[test]
    fn test_from_notation_whole_overs() {
        assert_eq!(Overs::from_notation(0.0).unwrap().balls(), 0);
        assert_eq!(Overs::from_notation(4.0).unwrap().balls(), 24);
        assert_eq!(Overs::from_notation(50.0).unwrap().balls(), 300);
    }

    #[test]
    fn test_from_notation_partial_over() {
        assert_eq!(Overs::from_notation(4.3).unwrap().balls(), 27);
        assert_eq!(Overs::from_notation(0.5).unwrap().balls(), 5);
        assert_eq!(Overs::from_notation(19.1).unwrap().balls(), 115);
    }

    #[test]
    fn test_from_notation_rejects_six_or_more_balls() {
        for bad in [3.6, 3.7, 0.9] {
            let err = Overs::from_notation(bad).unwrap_err();
            assert!(err.is_invalid_argument());
            assert!(err.to_string().contains("balls-in-over must be 0-5"), "{err}");
        }
    }

    #[test]
    fn test_from_notation_rejects_second_fractional_digit() {
        let err = Overs::from_notation(4.25).unwrap_err();
        assert!(err.to_string().contains("at most one digit"));
    }

    #[test]
    fn test_from_notation_rejects_negative_and_nan() {
        assert!(Overs::from_notation(-1.0).is_err());
        assert!(Overs::from_notation(f64::NAN).is_err());
        assert!(Overs::from_notation(f64::INFINITY).is_err());
    }

    // ── round trip and arithmetic ─────────────────────────────────────────────

    #[test]
    fn test_notation_round_trip() {
        let overs = Overs::from_notation(4.3).unwrap();
        assert_eq!(overs.balls(), 27);
        assert_eq!(overs.to_string(), "4.3");
        assert!((overs.as_notation() - 4.3).abs() < 1e-9);
    }

    #[test]
    fn test_two_five_ball_spells_make_one_over_four() {
        let spell = Overs::from_notation(0.5).unwrap();
        let total = spell.checked_add(spell).unwrap();
        assert_eq!(total.balls(), 10);
        assert_eq!(total.to_string(), "1.4");
    }

    #[test]
    fn test_checked_add_accumulates_balls() {
        let total = [4.3, 2.3, 10.0]
            .iter()
            .map(|o| Overs::from_notation(*o).unwrap())
            .try_fold(Overs::default(), Overs::checked_add)
            .unwrap();
        assert_eq!(total.balls(), 27 + 15 + 60);
        assert_eq!(total.to_string(), "17");
    }

    #[test]
    fn test_checked_add_overflow_is_none() {
        let big = Overs::from_balls(u32::MAX - 2);
        assert_eq!(big.checked_add(Overs::from_balls(2)).map(|o| o.balls()), Some(u32::MAX));
        assert_eq!(big.checked_add(Overs::from_balls(3)), None);
    }

    #[test]
    fn test_fractional_overs_for_economy() {
        let overs = Overs::from_balls(27);
        assert!((overs.as_fractional_overs() - 4.5).abs() < 1e-9);
    }

    // ── FromStr ───────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_valid_strings() {
        assert_eq!("12".parse::<Overs>().unwrap().balls(), 72);
        assert_eq!("12.0".parse::<Overs>().unwrap().balls(), 72);
        assert_eq!(" 3.5 ".parse::<Overs>().unwrap().balls(), 23);
    }

    #[test]
    fn test_parse_invalid_strings() {
        assert!("3.6".parse::<Overs>().is_err());
        assert!("3.45".parse::<Overs>().is_err());
        assert!("-1".parse::<Overs>().is_err());
        assert!("four".parse::<Overs>().is_err());
        assert!("".parse::<Overs>().is_err());
    }
}
