//! Query layer for Scorebook.
//!
//! Resolves season scope against a raw score provider and drives the
//! aggregators and leaderboard ranker.

pub mod orchestrator;

pub use scorebook_core as core;
pub use scorebook_data as data;
