//! Core types for Scorebook.
//!
//! Holds the raw scorecard rows and computed summary shapes, cricket overs
//! notation, the shared error type, display helpers, the raw score provider
//! contract and CLI/config settings.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod overs;
pub mod provider;
pub mod settings;

pub use error::{Result, StatsError};
