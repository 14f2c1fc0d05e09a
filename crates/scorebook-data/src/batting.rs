//! Batting aggregation.
//!
//! Folds per-innings [`BattingRow`]s into a [`BattingSummary`] in a single
//! pass. Rows are grouped by member only; a player's team can change from
//! fixture to fixture.

use std::collections::BTreeMap;

use scorebook_core::calculations::RateCalculator;
use scorebook_core::error::Result;
use scorebook_core::models::{BattingRow, BattingSummary, HighScore, MemberId};
use tracing::debug;

use crate::validation::{accumulate, non_negative, same_member};

/// Runs needed for a century.
pub const CENTURY: u32 = 100;
/// Runs needed for a half-century.
pub const HALF_CENTURY: u32 = 50;

// ── BattingTally ──────────────────────────────────────────────────────────────

/// Running totals for one member while folding rows.
#[derive(Debug, Clone, Default)]
struct BattingTally {
    innings: u32,
    not_outs: u32,
    runs: u32,
    balls: u32,
    fours: u32,
    sixes: u32,
    centuries: u32,
    half_centuries: u32,
    ducks: u32,
    highest: Option<HighScore>,
}

impl BattingTally {
    fn add_row(&mut self, row: &BattingRow) -> Result<()> {
        let (member, fixture) = (row.member_id, row.fixture_id);
        let runs = non_negative("runs", row.runs, member, fixture)?;
        let balls = non_negative("balls", row.balls, member, fixture)?;
        let fours = non_negative("fours", row.fours, member, fixture)?;
        let sixes = non_negative("sixes", row.sixes, member, fixture)?;

        accumulate("runs", &mut self.runs, runs, member, fixture)?;
        accumulate("balls", &mut self.balls, balls, member, fixture)?;
        accumulate("fours", &mut self.fours, fours, member, fixture)?;
        accumulate("sixes", &mut self.sixes, sixes, member, fixture)?;
        self.innings += 1;
        if !row.is_out {
            self.not_outs += 1;
        }

        if runs >= CENTURY {
            self.centuries += 1;
        } else if runs >= HALF_CENTURY {
            self.half_centuries += 1;
        }
        if runs == 0 && row.is_out {
            self.ducks += 1;
        }

        let score = HighScore {
            runs,
            not_out: !row.is_out,
        };
        if self.highest.map_or(true, |current| score.beats(&current)) {
            self.highest = Some(score);
        }
        Ok(())
    }

    fn finish(self, member_id: MemberId) -> BattingSummary {
        let dismissals = self.innings - self.not_outs;
        BattingSummary {
            member_id,
            innings: self.innings,
            not_outs: self.not_outs,
            total_runs: self.runs,
            total_balls: self.balls,
            highest_score: self.highest,
            average: RateCalculator::batting_average(self.runs, dismissals),
            unbeaten: self.innings > 0 && dismissals == 0,
            strike_rate: RateCalculator::batting_strike_rate(self.runs, self.balls),
            total_fours: self.fours,
            total_sixes: self.sixes,
            centuries: self.centuries,
            half_centuries: self.half_centuries,
            ducks: self.ducks,
        }
    }
}

// ── BattingAggregator ─────────────────────────────────────────────────────────

/// Stateless batting aggregation.
pub struct BattingAggregator;

impl BattingAggregator {
    /// Aggregate one member's rows.
    ///
    /// Every row must belong to `member_id`. A negative count or a foreign row
    /// fails the whole aggregation with `InvalidArgument`. No rows yields
    /// [`BattingSummary::empty`].
    pub fn aggregate(rows: &[BattingRow], member_id: MemberId) -> Result<BattingSummary> {
        let mut tally = BattingTally::default();
        for row in rows {
            same_member(member_id, row.member_id, row.fixture_id)?;
            tally.add_row(row)?;
        }
        debug!(member_id, innings = tally.innings, "aggregated batting rows");
        Ok(tally.finish(member_id))
    }

    /// Group mixed rows by member and aggregate each group.
    ///
    /// Returns summaries ordered by member id. Members with no rows do not
    /// appear.
    pub fn aggregate_by_member(rows: &[BattingRow]) -> Result<Vec<BattingSummary>> {
        let mut tallies: BTreeMap<MemberId, BattingTally> = BTreeMap::new();
        for row in rows {
            tallies.entry(row.member_id).or_default().add_row(row)?;
        }
        debug!(members = tallies.len(), rows = rows.len(), "aggregated batting by member");
        Ok(tallies
            .into_iter()
            .map(|(member_id, tally)| tally.finish(member_id))
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
