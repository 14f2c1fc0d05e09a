//! Leaderboard ranking.
//!
//! A generic multi-key ranker over per-member summaries. Candidates sort by a
//! primary value (descending), then by tie-break keys in declared order, then
//! by member id so the output is identical for any input order. Fully tied
//! candidates share a competition rank (1, 1, 3, ...). Undefined tie-break
//! values sort after every defined value whichever direction the key runs.

use std::cmp::Ordering;

use scorebook_core::error::{Result, StatsError};
use scorebook_core::models::{BattingSummary, BowlingSummary, LeaderboardEntry, MemberId};
use tracing::debug;

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Which end of a key is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// A named tie-break key.
pub struct RankKey<S> {
    pub label: &'static str,
    pub direction: Direction,
    select: fn(&S) -> Option<f64>,
}

impl<S> RankKey<S> {
    pub fn higher_is_better(label: &'static str, select: fn(&S) -> Option<f64>) -> Self {
        Self {
            label,
            direction: Direction::HigherIsBetter,
            select,
        }
    }

    pub fn lower_is_better(label: &'static str, select: fn(&S) -> Option<f64>) -> Self {
        Self {
            label,
            direction: Direction::LowerIsBetter,
            select,
        }
    }

    /// Extract this key from a summary.
    pub fn value(&self, stats: &S) -> Option<f64> {
        (self.select)(stats)
    }
}

/// Primary value plus ordered tie-break keys for one leaderboard.
pub struct RankingRule<S> {
    pub primary_label: &'static str,
    primary: fn(&S) -> f64,
    pub tie_breaks: Vec<RankKey<S>>,
}

impl<S> RankingRule<S> {
    pub fn new(
        primary_label: &'static str,
        primary: fn(&S) -> f64,
        tie_breaks: Vec<RankKey<S>>,
    ) -> Self {
        Self {
            primary_label,
            primary,
            tie_breaks,
        }
    }

    /// Extract the primary value from a summary.
    pub fn primary_value(&self, stats: &S) -> f64 {
        (self.primary)(stats)
    }
}

impl RankingRule<BattingSummary> {
    /// Total runs, then average, then strike rate; all higher is better.
    pub fn batting() -> Self {
        Self::new(
            "runs",
            |s: &BattingSummary| f64::from(s.total_runs),
            vec![
                RankKey::higher_is_better("average", |s: &BattingSummary| s.average),
                RankKey::higher_is_better("strike_rate", |s: &BattingSummary| {
                    Some(s.strike_rate)
                }),
            ],
        )
    }
}

impl RankingRule<BowlingSummary> {
    /// Wickets, then average and economy, where lower is better.
    pub fn bowling() -> Self {
        Self::new(
            "wickets",
            |s: &BowlingSummary| f64::from(s.wickets),
            vec![
                RankKey::lower_is_better("average", |s: &BowlingSummary| s.average),
                RankKey::lower_is_better("economy", |s: &BowlingSummary| s.economy),
            ],
        )
    }
}

// ── Candidates ────────────────────────────────────────────────────────────────

/// A member's summary awaiting a rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<S> {
    pub member_id: MemberId,
    pub member_name: String,
    pub stats: S,
}

/// Candidate with its keys extracted once.
struct Keyed<S> {
    candidate: Candidate<S>,
    primary: f64,
    tie_breaks: Vec<Option<f64>>,
}

// ── LeaderboardRanker ─────────────────────────────────────────────────────────

/// Stateless leaderboard ranking.
pub struct LeaderboardRanker;

impl LeaderboardRanker {
    /// Rank `candidates` under `rule`, keeping every entry whose rank is at
    /// most `top_n`.
    ///
    /// When the `top_n`-th place is shared, every member sharing it is kept,
    /// so the result can hold more than `top_n` entries. `top_n` of zero fails
    /// with `InvalidArgument`.
    pub fn rank<S>(
        candidates: Vec<Candidate<S>>,
        rule: &RankingRule<S>,
        top_n: usize,
    ) -> Result<Vec<LeaderboardEntry<S>>> {
        if top_n < 1 {
            return Err(StatsError::invalid("top_n must be >= 1, got 0"));
        }

        let directions: Vec<Direction> = rule.tie_breaks.iter().map(|k| k.direction).collect();
        let mut keyed: Vec<Keyed<S>> = candidates
            .into_iter()
            .map(|candidate| Keyed {
                primary: rule.primary_value(&candidate.stats),
                tie_breaks: rule
                    .tie_breaks
                    .iter()
                    .map(|k| k.value(&candidate.stats))
                    .collect(),
                candidate,
            })
            .collect();
        let total = keyed.len();

        keyed.sort_by(|a, b| {
            compare_keys(a, b, &directions)
                .then_with(|| a.candidate.member_id.cmp(&b.candidate.member_id))
        });

        let mut entries: Vec<LeaderboardEntry<S>> = Vec::with_capacity(keyed.len().min(top_n));
        let mut previous: Option<(f64, Vec<Option<f64>>, u32)> = None;

        for (position, item) in keyed.into_iter().enumerate() {
            let rank = match &previous {
                Some((primary, tie_breaks, rank))
                    if keys_equal(*primary, tie_breaks, item.primary, &item.tie_breaks, &directions) =>
                {
                    *rank
                }
                _ => (position + 1) as u32,
            };
            if rank as usize > top_n {
                break;
            }
            previous = Some((item.primary, item.tie_breaks.clone(), rank));
            entries.push(LeaderboardEntry {
                rank,
                member_id: item.candidate.member_id,
                member_name: item.candidate.member_name,
                primary_value: item.primary,
                secondary_keys: item.tie_breaks,
                stats: item.candidate.stats,
            });
        }

        debug!(
            candidates = total,
            entries = entries.len(),
            top_n,
            primary = rule.primary_label,
            "ranked leaderboard"
        );
        Ok(entries)
    }
}

// ── Comparison helpers ────────────────────────────────────────────────────────

/// `Less` means `a` ranks ahead of `b`.
fn compare_value(a: Option<f64>, b: Option<f64>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            Direction::HigherIsBetter => y.total_cmp(&x),
            Direction::LowerIsBetter => x.total_cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_keys<S>(a: &Keyed<S>, b: &Keyed<S>, directions: &[Direction]) -> Ordering {
    b.primary.total_cmp(&a.primary).then_with(|| {
        directions
            .iter()
            .zip(a.tie_breaks.iter().zip(&b.tie_breaks))
            .map(|(dir, (x, y))| compare_value(*x, *y, *dir))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}

fn keys_equal(
    a_primary: f64,
    a_keys: &[Option<f64>],
    b_primary: f64,
    b_keys: &[Option<f64>],
    directions: &[Direction],
) -> bool {
    a_primary.total_cmp(&b_primary) == Ordering::Equal
        && directions
            .iter()
            .zip(a_keys.iter().zip(b_keys))
            .all(|(dir, (x, y))| compare_value(*x, *y, *dir) == Ordering::Equal)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
