use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::overs::Overs;

/// Club member identifier.
pub type MemberId = i64;
/// Team identifier.
pub type TeamId = i64;
/// Fixture (match) identifier.
pub type FixtureId = i64;
/// Season identifier.
pub type SeasonId = i64;

// ── Raw rows ─────────────────────────────────────────────────────────────────

/// One batter's innings as recorded on a finalised scorecard.
///
/// Counts are signed because they arrive from the persistence layer as plain
/// integers; the aggregators reject negative values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingRow {
    pub fixture_id: FixtureId,
    pub team_id: TeamId,
    pub member_id: MemberId,
    pub runs: i32,
    pub balls: i32,
    #[serde(default)]
    pub fours: i32,
    #[serde(default)]
    pub sixes: i32,
    pub is_out: bool,
}

/// One bowler's figures in a single innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingRow {
    pub fixture_id: FixtureId,
    pub team_id: TeamId,
    pub member_id: MemberId,
    /// Overs in `overs.balls` notation, e.g. `4.3` for 27 balls.
    pub overs: f64,
    #[serde(default)]
    pub maidens: i32,
    pub runs_conceded: i32,
    pub wickets: i32,
    #[serde(default)]
    pub no_balls: i32,
    #[serde(default)]
    pub wides: i32,
}

// ── Batting ──────────────────────────────────────────────────────────────────

/// A batter's best single innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub runs: u32,
    pub not_out: bool,
}

impl HighScore {
    /// Whether this score should replace `current` as the highest.
    ///
    /// More runs wins; on equal runs a not-out beats a dismissal.
    pub fn beats(&self, current: &HighScore) -> bool {
        self.runs > current.runs || (self.runs == current.runs && self.not_out && !current.not_out)
    }
}

impl fmt::Display for HighScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.not_out {
            write!(f, "{}*", self.runs)
        } else {
            write!(f, "{}", self.runs)
        }
    }
}

/// Batting record for one member over a season or career.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingSummary {
    pub member_id: MemberId,
    pub innings: u32,
    pub not_outs: u32,
    pub total_runs: u32,
    pub total_balls: u32,
    pub highest_score: Option<HighScore>,
    /// Runs per dismissal; `None` when the batter has never been out.
    pub average: Option<f64>,
    /// Set when the member has batted and was never dismissed.
    pub unbeaten: bool,
    /// Runs per 100 balls; `0.0` when no balls were faced.
    pub strike_rate: f64,
    pub total_fours: u32,
    pub total_sixes: u32,
    pub centuries: u32,
    pub half_centuries: u32,
    pub ducks: u32,
}

impl BattingSummary {
    /// Summary for a member with no innings in scope.
    pub fn empty(member_id: MemberId) -> Self {
        Self {
            member_id,
            innings: 0,
            not_outs: 0,
            total_runs: 0,
            total_balls: 0,
            highest_score: None,
            average: None,
            unbeaten: false,
            strike_rate: 0.0,
            total_fours: 0,
            total_sixes: 0,
            centuries: 0,
            half_centuries: 0,
            ducks: 0,
        }
    }

    /// Innings that ended in a dismissal.
    pub fn dismissals(&self) -> u32 {
        self.innings - self.not_outs
    }
}

// ── Bowling ──────────────────────────────────────────────────────────────────

/// Wickets and runs from a single bowling innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestFigures {
    pub wickets: u32,
    pub runs: u32,
}

impl BestFigures {
    /// More wickets is better; for equal wickets fewer runs is better.
    pub fn compare(&self, other: &BestFigures) -> Ordering {
        self.wickets
            .cmp(&other.wickets)
            .then_with(|| other.runs.cmp(&self.runs))
    }

    /// Strictly better than `other`.
    pub fn beats(&self, other: &BestFigures) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

impl fmt::Display for BestFigures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.wickets, self.runs)
    }
}

/// Bowling record for one member over a season or career.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingSummary {
    pub member_id: MemberId,
    pub innings: u32,
    pub total_balls: u32,
    /// `total_balls` re-rendered in overs notation, e.g. `"17.4"`.
    pub overs_display: String,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    /// Runs per wicket; `None` without a wicket.
    pub average: Option<f64>,
    /// Runs per six-ball over; `None` when no balls were bowled.
    pub economy: Option<f64>,
    /// Balls per wicket; `None` without a wicket.
    pub strike_rate: Option<f64>,
    pub best_figures: Option<BestFigures>,
    pub five_wicket_hauls: u32,
    pub no_balls: u32,
    pub wides: u32,
}

impl BowlingSummary {
    /// Summary for a member with no bowling in scope.
    pub fn empty(member_id: MemberId) -> Self {
        Self {
            member_id,
            innings: 0,
            total_balls: 0,
            overs_display: Overs::default().to_string(),
            maidens: 0,
            runs_conceded: 0,
            wickets: 0,
            average: None,
            economy: None,
            strike_rate: None,
            best_figures: None,
            five_wicket_hauls: 0,
            no_balls: 0,
            wides: 0,
        }
    }

    /// Balls bowled as an [`Overs`] value.
    pub fn overs(&self) -> Overs {
        Overs::from_balls(self.total_balls)
    }
}

// ── Leaderboards ─────────────────────────────────────────────────────────────

/// One line of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry<S> {
    /// 1-based competition rank; fully tied entries share a rank.
    pub rank: u32,
    pub member_id: MemberId,
    pub member_name: String,
    pub primary_value: f64,
    /// Tie-break values in declared order; `None` for an undefined metric.
    pub secondary_keys: Vec<Option<f64>>,
    pub stats: S,
}

// ── Reference data ───────────────────────────────────────────────────────────

/// A club member as known to the score provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

/// Season boundaries; both dates are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    #[serde(default)]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Season {
    /// Whether `date` falls inside the season.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Label used when a member has no recorded name.
pub fn fallback_member_name(member_id: MemberId) -> String {
    format!("Member #{member_id}")
}
