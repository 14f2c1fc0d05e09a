//! The raw score provider contract.
//!
//! Aggregation never fetches data itself: a [`RawScoreProvider`] hands over
//! fully materialised row sets, already narrowed to a season when one is
//! requested. Storage and fetch mechanics belong to the implementor.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{Result, StatsError};
use crate::models::{BattingRow, BowlingRow, MemberId, SeasonId};

/// Source of recorded scorecard rows.
pub trait RawScoreProvider: Send + Sync {
    /// All batting rows, or only those from fixtures in `season`.
    fn batting_rows(&self, season: Option<SeasonId>) -> Result<Vec<BattingRow>>;

    /// All bowling rows, or only those from fixtures in `season`.
    fn bowling_rows(&self, season: Option<SeasonId>) -> Result<Vec<BowlingRow>>;

    /// Display names keyed by member id.
    fn member_names(&self) -> Result<HashMap<MemberId, String>>;
}

impl<P: RawScoreProvider + ?Sized> RawScoreProvider for Arc<P> {
    fn batting_rows(&self, season: Option<SeasonId>) -> Result<Vec<BattingRow>> {
        (**self).batting_rows(season)
    }

    fn bowling_rows(&self, season: Option<SeasonId>) -> Result<Vec<BowlingRow>> {
        (**self).bowling_rows(season)
    }

    fn member_names(&self) -> Result<HashMap<MemberId, String>> {
        (**self).member_names()
    }
}

// ── InMemoryScoreProvider ─────────────────────────────────────────────────────

/// Provider backed by rows held in memory, each tagged with its season.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreProvider {
    seasons: BTreeSet<SeasonId>,
    batting: Vec<(SeasonId, BattingRow)>,
    bowling: Vec<(SeasonId, BowlingRow)>,
    members: HashMap<MemberId, String>,
}

impl InMemoryScoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a season that may have no rows yet.
    pub fn with_season(mut self, season: SeasonId) -> Self {
        self.seasons.insert(season);
        self
    }

    pub fn with_member(mut self, id: MemberId, name: impl Into<String>) -> Self {
        self.members.insert(id, name.into());
        self
    }

    pub fn with_batting(mut self, season: SeasonId, row: BattingRow) -> Self {
        self.seasons.insert(season);
        self.batting.push((season, row));
        self
    }

    pub fn with_bowling(mut self, season: SeasonId, row: BowlingRow) -> Self {
        self.seasons.insert(season);
        self.bowling.push((season, row));
        self
    }

    fn check_season(&self, season: Option<SeasonId>) -> Result<()> {
        match season {
            Some(id) if !self.seasons.contains(&id) => Err(StatsError::SeasonNotFound(id)),
            _ => Ok(()),
        }
    }
}

fn in_scope<T: Clone>(rows: &[(SeasonId, T)], season: Option<SeasonId>) -> Vec<T> {
    rows.iter()
        .filter(|(s, _)| season.map_or(true, |wanted| *s == wanted))
        .map(|(_, row)| row.clone())
        .collect()
}

impl RawScoreProvider for InMemoryScoreProvider {
    fn batting_rows(&self, season: Option<SeasonId>) -> Result<Vec<BattingRow>> {
        self.check_season(season)?;
        Ok(in_scope(&self.batting, season))
    }

    fn bowling_rows(&self, season: Option<SeasonId>) -> Result<Vec<BowlingRow>> {
        self.check_season(season)?;
        Ok(in_scope(&self.bowling, season))
    }

    fn member_names(&self) -> Result<HashMap<MemberId, String>> {
        Ok(self.members.clone())
    }
}
