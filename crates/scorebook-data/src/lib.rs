//! Aggregation layer for Scorebook.
//!
//! Folds raw batting and bowling rows into per-member summaries, ranks
//! summaries into leaderboards, and provides a raw score provider backed by
//! a directory of JSON scorecards.

pub mod batting;
pub mod bowling;
pub mod ranking;
pub mod reader;
mod validation;

pub use scorebook_core as core;
