//! Stats orchestrator.
//!
//! The only component that talks to a [`RawScoreProvider`]. Season filtering
//! is left to the provider so the aggregators stay season-agnostic. Every
//! query fetches its own row set and holds no state between calls, so one
//! orchestrator can serve concurrent queries from several threads.

use std::collections::HashMap;

use scorebook_core::error::Result;
use scorebook_core::models::{
    fallback_member_name, BattingSummary, BowlingSummary, LeaderboardEntry, MemberId, SeasonId,
};
use scorebook_core::provider::RawScoreProvider;
use scorebook_data::batting::BattingAggregator;
use scorebook_data::bowling::BowlingAggregator;
use scorebook_data::ranking::{Candidate, LeaderboardRanker, RankingRule};
use serde::Serialize;

/// A ranked batting leaderboard.
pub type BattingLeaderboard = Vec<LeaderboardEntry<BattingSummary>>;
/// A ranked bowling leaderboard.
pub type BowlingLeaderboard = Vec<LeaderboardEntry<BowlingSummary>>;

/// Both leaderboards for one scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    pub season: Option<SeasonId>,
    pub batting: BattingLeaderboard,
    pub bowling: BowlingLeaderboard,
}

// ── StatsOrchestrator ─────────────────────────────────────────────────────────

/// Answers per-member and leaderboard queries over a provider.
pub struct StatsOrchestrator<P> {
    provider: P,
}

impl<P: RawScoreProvider> StatsOrchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Batting summary for one member, career-wide when `season` is `None`.
    ///
    /// A member with no innings in scope gets an empty summary, not an error.
    pub fn batting_stats(
        &self,
        member_id: MemberId,
        season: Option<SeasonId>,
    ) -> Result<BattingSummary> {
        let rows: Vec<_> = self
            .provider
            .batting_rows(season)?
            .into_iter()
            .filter(|r| r.member_id == member_id)
            .collect();
        tracing::debug!(member_id, ?season, rows = rows.len(), "batting stats query");
        BattingAggregator::aggregate(&rows, member_id)
    }

    /// Bowling summary for one member, career-wide when `season` is `None`.
    pub fn bowling_stats(
        &self,
        member_id: MemberId,
        season: Option<SeasonId>,
    ) -> Result<BowlingSummary> {
        let rows: Vec<_> = self
            .provider
            .bowling_rows(season)?
            .into_iter()
            .filter(|r| r.member_id == member_id)
            .collect();
        tracing::debug!(member_id, ?season, rows = rows.len(), "bowling stats query");
        BowlingAggregator::aggregate(&rows, member_id)
    }

    /// Batting leaderboard: runs, then average, then strike rate.
    ///
    /// Only members with at least one innings in scope appear.
    pub fn batting_leaderboard(
        &self,
        season: Option<SeasonId>,
        top_n: usize,
    ) -> Result<BattingLeaderboard> {
        let rows = self.provider.batting_rows(season)?;
        let summaries = BattingAggregator::aggregate_by_member(&rows)?;
        let candidates = self.candidates(summaries, |s: &BattingSummary| s.member_id)?;
        tracing::debug!(?season, top_n, members = candidates.len(), "batting leaderboard query");
        LeaderboardRanker::rank(candidates, &RankingRule::batting(), top_n)
    }

    /// Bowling leaderboard: wickets, then lowest average, then lowest economy.
    pub fn bowling_leaderboard(
        &self,
        season: Option<SeasonId>,
        top_n: usize,
    ) -> Result<BowlingLeaderboard> {
        let rows = self.provider.bowling_rows(season)?;
        let summaries = BowlingAggregator::aggregate_by_member(&rows)?;
        let candidates = self.candidates(summaries, |s: &BowlingSummary| s.member_id)?;
        tracing::debug!(?season, top_n, members = candidates.len(), "bowling leaderboard query");
        LeaderboardRanker::rank(candidates, &RankingRule::bowling(), top_n)
    }

    /// Both leaderboards for one scope.
    pub fn season_report(&self, season: Option<SeasonId>, top_n: usize) -> Result<SeasonReport> {
        Ok(SeasonReport {
            season,
            batting: self.batting_leaderboard(season, top_n)?,
            bowling: self.bowling_leaderboard(season, top_n)?,
        })
    }

    fn candidates<S>(
        &self,
        summaries: Vec<S>,
        member_of: fn(&S) -> MemberId,
    ) -> Result<Vec<Candidate<S>>> {
        let mut names: HashMap<MemberId, String> = self.provider.member_names()?;
        Ok(summaries
            .into_iter()
            .map(|stats| {
                let member_id = member_of(&stats);
                Candidate {
                    member_id,
                    member_name: names
                        .remove(&member_id)
                        .unwrap_or_else(|| fallback_member_name(member_id)),
                    stats,
                }
            })
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::error::StatsError;
    use scorebook_core::models::{BattingRow, BowlingRow};
    use scorebook_core::provider::InMemoryScoreProvider;
    use std::sync::Arc;

    fn bat(fixture_id: i64, member_id: MemberId, runs: i32, balls: i32, is_out: bool) -> BattingRow {
        BattingRow {
            fixture_id,
            team_id: 1,
            member_id,
            runs,
            balls,
            fours: 0,
            sixes: 0,
            is_out,
        }
    }

    fn bowl(fixture_id: i64, member_id: MemberId, overs: f64, runs: i32, wickets: i32) -> BowlingRow {
        BowlingRow {
            fixture_id,
            team_id: 1,
            member_id,
            overs,
            maidens: 0,
            runs_conceded: runs,
            wickets,
            no_balls: 0,
            wides: 0,
        }
    }

    /// Two seasons; member 3 only played in 2023.
    fn club() -> InMemoryScoreProvider {
        InMemoryScoreProvider::new()
            .with_member(1, "A. Cook")
            .with_member(2, "K. Pietersen")
            .with_member(3, "G. Gooch")
            .with_batting(2023, bat(10, 3, 180, 200, true))
            .with_batting(2023, bat(10, 1, 20, 30, true))
            .with_batting(2024, bat(20, 1, 45, 30, true))
            .with_batting(2024, bat(21, 1, 60, 40, false))
            .with_batting(2024, bat(20, 2, 70, 50, true))
            .with_batting(2024, bat(22, 4, 5, 8, true))
            .with_bowling(2023, bowl(10, 3, 10.0, 40, 5))
            .with_bowling(2024, bowl(20, 2, 4.3, 20, 2))
            .with_bowling(2024, bowl(21, 2, 5.3, 40, 2))
            .with_bowling(2024, bowl(20, 1, 3.0, 12, 0))
    }

    // ── per-member queries ────────────────────────────────────────────────────

    #[test]
    fn test_batting_stats_season_scope() {
        let stats = StatsOrchestrator::new(club());
        let s = stats.batting_stats(1, Some(2024)).unwrap();
        assert_eq!(s.innings, 2);
        assert_eq!(s.not_outs, 1);
        assert_eq!(s.total_runs, 105);
        assert_eq!(s.average, Some(105.0));
        assert!((s.strike_rate - 150.0).abs() < 1e-9);
        assert_eq!(s.highest_score.unwrap().to_string(), "60*");
    }

    #[test]
    fn test_batting_stats_career_scope() {
        let stats = StatsOrchestrator::new(club());
        let s = stats.batting_stats(1, None).unwrap();
        assert_eq!(s.innings, 3);
        assert_eq!(s.total_runs, 125);
    }

    #[test]
    fn test_stats_for_member_without_rows_is_empty() {
        let stats = StatsOrchestrator::new(club());
        assert_eq!(stats.batting_stats(3, Some(2024)).unwrap(), BattingSummary::empty(3));
        assert_eq!(stats.bowling_stats(99, None).unwrap(), BowlingSummary::empty(99));
    }

    #[test]
    fn test_bowling_stats_sums_balls() {
        let stats = StatsOrchestrator::new(club());
        let s = stats.bowling_stats(2, Some(2024)).unwrap();
        assert_eq!(s.total_balls, 60);
        assert_eq!(s.overs_display, "10");
        assert_eq!(s.average, Some(15.0));
    }

    #[test]
    fn test_unknown_season_propagates() {
        let stats = StatsOrchestrator::new(club());
        let err = stats.batting_leaderboard(Some(1900), 3).unwrap_err();
        assert!(matches!(err, StatsError::SeasonNotFound(1900)));
    }

    // ── leaderboards ──────────────────────────────────────────────────────────

    #[test]
    fn test_batting_leaderboard_excludes_members_absent_from_season() {
        let stats = StatsOrchestrator::new(club());
        let board = stats.batting_leaderboard(Some(2024), 3).unwrap();
        let ids: Vec<_> = board.iter().map(|e| e.member_id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert!(!ids.contains(&3));
        assert_eq!(board[0].member_name, "A. Cook");
        assert_eq!(board[0].primary_value, 105.0);
        assert_eq!(board[2].member_name, "Member #4");
    }

    #[test]
    fn test_batting_leaderboard_career_includes_everyone() {
        let stats = StatsOrchestrator::new(club());
        let board = stats.batting_leaderboard(None, 10).unwrap();
        assert_eq!(board[0].member_id, 3);
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn test_bowling_leaderboard_undefined_average_last() {
        let stats = StatsOrchestrator::new(club());
        let board = stats.bowling_leaderboard(Some(2024), 5).unwrap();
        let ids: Vec<_> = board.iter().map(|e| e.member_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(board[1].stats.average, None);
        assert_eq!(board[1].secondary_keys[0], None);
    }

    #[test]
    fn test_leaderboard_top_n_zero_rejected() {
        let stats = StatsOrchestrator::new(club());
        assert!(stats.bowling_leaderboard(None, 0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_malformed_row_fails_whole_leaderboard() {
        let provider = club().with_bowling(2024, bowl(30, 5, 2.7, 10, 0));
        let stats = StatsOrchestrator::new(provider);
        assert!(stats.bowling_leaderboard(Some(2024), 5).is_err());
        // Batting is unaffected.
        assert!(stats.batting_leaderboard(Some(2024), 5).is_ok());
    }

    #[test]
    fn test_season_report() {
        let stats = StatsOrchestrator::new(club());
        let report = stats.season_report(Some(2023), 1).unwrap();
        assert_eq!(report.season, Some(2023));
        assert_eq!(report.batting[0].member_id, 3);
        assert_eq!(report.bowling[0].member_id, 3);
        assert_eq!(report.bowling[0].stats.best_figures.unwrap().to_string(), "5/40");
    }

    #[test]
    fn test_leaderboard_is_deterministic() {
        let stats = StatsOrchestrator::new(club());
        let first = serde_json::to_string(&stats.batting_leaderboard(None, 10).unwrap()).unwrap();
        let second = serde_json::to_string(&stats.batting_leaderboard(None, 10).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    // ── provider failures ─────────────────────────────────────────────────────

    struct FailingProvider;

    impl RawScoreProvider for FailingProvider {
        fn batting_rows(&self, _season: Option<SeasonId>) -> Result<Vec<BattingRow>> {
            Err(anyhow::anyhow!("connection reset").into())
        }

        fn bowling_rows(&self, _season: Option<SeasonId>) -> Result<Vec<BowlingRow>> {
            Err(anyhow::anyhow!("connection reset").into())
        }

        fn member_names(&self) -> Result<HashMap<MemberId, String>> {
            Ok(HashMap::new())
        }
    }

    #[test]
    fn test_provider_failure_propagates_unchanged() {
        let stats = StatsOrchestrator::new(FailingProvider);
        let err = stats.batting_stats(1, None).unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_concurrent_queries_share_one_orchestrator() {
        let stats = Arc::new(StatsOrchestrator::new(club()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || stats.batting_leaderboard(Some(2024), 3).unwrap())
            })
            .collect();
        let boards: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(boards.windows(2).all(|w| w[0] == w[1]));
    }
}
