//! Bowling aggregation.
//!
//! Each row's overs figure is converted to balls up front; totals are kept in
//! balls and rendered back to overs notation only for `overs_display`. Rates
//! with a zero denominator are reported as `None`.

use std::collections::BTreeMap;

use scorebook_core::calculations::RateCalculator;
use scorebook_core::error::{Result, StatsError};
use scorebook_core::models::{BestFigures, BowlingRow, BowlingSummary, MemberId};
use scorebook_core::overs::Overs;
use tracing::debug;

use crate::validation::{accumulate, non_negative, same_member};

/// Most wickets one bowler can take in an innings.
pub const MAX_WICKETS: u32 = 10;
/// Wickets in an innings that count as a five-wicket haul.
pub const FIVE_WICKET_HAUL: u32 = 5;

// ── BowlingTally ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct BowlingTally {
    innings: u32,
    bowled: Overs,
    maidens: u32,
    runs_conceded: u32,
    wickets: u32,
    no_balls: u32,
    wides: u32,
    five_wicket_hauls: u32,
    best: Option<BestFigures>,
}

impl BowlingTally {
    fn add_row(&mut self, row: &BowlingRow) -> Result<()> {
        let (member, fixture) = (row.member_id, row.fixture_id);
        let overs = Overs::from_notation(row.overs).map_err(|e| match e {
            StatsError::MalformedOvers { overs, reason } => StatsError::MalformedOvers {
                overs,
                reason: format!("{reason} (member {member}, fixture {fixture})"),
            },
            other => other,
        })?;
        let maidens = non_negative("maidens", row.maidens, member, fixture)?;
        let runs = non_negative("runs_conceded", row.runs_conceded, member, fixture)?;
        let wickets = non_negative("wickets", row.wickets, member, fixture)?;
        if wickets > MAX_WICKETS {
            return Err(StatsError::invalid(format!(
                "wickets must be 0-{MAX_WICKETS}, got {wickets} (member {member}, fixture {fixture})"
            )));
        }
        let no_balls = non_negative("no_balls", row.no_balls, member, fixture)?;
        let wides = non_negative("wides", row.wides, member, fixture)?;

        self.bowled = self.bowled.checked_add(overs).ok_or_else(|| {
            StatsError::invalid(format!(
                "balls total overflows for member {member} (fixture {fixture})"
            ))
        })?;
        accumulate("maidens", &mut self.maidens, maidens, member, fixture)?;
        accumulate("runs_conceded", &mut self.runs_conceded, runs, member, fixture)?;
        accumulate("wickets", &mut self.wickets, wickets, member, fixture)?;
        accumulate("no_balls", &mut self.no_balls, no_balls, member, fixture)?;
        accumulate("wides", &mut self.wides, wides, member, fixture)?;
        self.innings += 1;
        if wickets >= FIVE_WICKET_HAUL {
            self.five_wicket_hauls += 1;
        }

        let figures = BestFigures { wickets, runs };
        if self.best.map_or(true, |best| figures.beats(&best)) {
            self.best = Some(figures);
        }
        Ok(())
    }

    fn finish(self, member_id: MemberId) -> BowlingSummary {
        BowlingSummary {
            member_id,
            innings: self.innings,
            total_balls: self.bowled.balls(),
            overs_display: self.bowled.to_string(),
            maidens: self.maidens,
            runs_conceded: self.runs_conceded,
            wickets: self.wickets,
            average: RateCalculator::bowling_average(self.runs_conceded, self.wickets),
            economy: RateCalculator::economy(self.runs_conceded, self.bowled),
            strike_rate: RateCalculator::bowling_strike_rate(self.bowled, self.wickets),
            best_figures: self.best,
            five_wicket_hauls: self.five_wicket_hauls,
            no_balls: self.no_balls,
            wides: self.wides,
        }
    }
}

// ── BowlingAggregator ─────────────────────────────────────────────────────────

/// Stateless bowling aggregation.
pub struct BowlingAggregator;

impl BowlingAggregator {
    /// Aggregate one member's rows.
    ///
    /// Fails with `InvalidArgument` on a negative count, more than ten
    /// wickets, malformed overs notation or a row for another member.
    pub fn aggregate(rows: &[BowlingRow], member_id: MemberId) -> Result<BowlingSummary> {
        let mut tally = BowlingTally::default();
        for row in rows {
            same_member(member_id, row.member_id, row.fixture_id)?;
            tally.add_row(row)?;
        }
        debug!(
            member_id,
            innings = tally.innings,
            balls = tally.bowled.balls(),
            "aggregated bowling rows"
        );
        Ok(tally.finish(member_id))
    }

    /// Group mixed rows by member and aggregate each group, ordered by
    /// member id.
    pub fn aggregate_by_member(rows: &[BowlingRow]) -> Result<Vec<BowlingSummary>> {
        let mut tallies: BTreeMap<MemberId, BowlingTally> = BTreeMap::new();
        for row in rows {
            tallies.entry(row.member_id).or_default().add_row(row)?;
        }
        debug!(members = tallies.len(), rows = rows.len(), "aggregated bowling by member");
        Ok(tallies
            .into_iter()
            .map(|(member_id, tally)| tally.finish(member_id))
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
