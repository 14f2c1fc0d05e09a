use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{MemberId, SeasonId};

/// Leaderboard size used when neither the CLI nor the config file sets one.
pub const DEFAULT_TOP: usize = 10;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Batting and bowling statistics for a cricket club
#[derive(Parser, Debug, Clone)]
#[command(
    name = "scorebook",
    about = "Batting and bowling statistics for a cricket club",
    version
)]
pub struct Settings {
    /// Directory holding members.json, seasons.json and fixtures/
    #[arg(long, global = true, env = "SCOREBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Write the effective data directory, leaderboard size and log level to the config file
    #[arg(long, global = true)]
    pub save_config: bool,

    /// Leaderboard size taken from the config file
    #[arg(skip = DEFAULT_TOP)]
    pub default_top: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// Queries understood by the CLI.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Batting summary for one member
    Batting {
        #[arg(long)]
        member: MemberId,
        /// Restrict to one season (career when omitted)
        #[arg(long)]
        season: Option<SeasonId>,
    },
    /// Bowling summary for one member
    Bowling {
        #[arg(long)]
        member: MemberId,
        #[arg(long)]
        season: Option<SeasonId>,
    },
    /// Ranked leaderboard for one discipline
    Leaderboard {
        #[arg(value_enum)]
        category: Category,
        #[arg(long)]
        season: Option<SeasonId>,
        /// Number of ranks to show
        #[arg(long)]
        top: Option<usize>,
    },
    /// Batting and bowling leaderboards together
    Report {
        #[arg(long)]
        season: Option<SeasonId>,
        #[arg(long)]
        top: Option<usize>,
    },
}

/// Leaderboard discipline.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Batting,
    Bowling,
}

// ── ScorebookConfig ────────────────────────────────────────────────────────────

/// Persisted defaults saved to `~/.scorebook/config.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ScorebookConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_top: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl ScorebookConfig {
    /// Default path of the config file, `~/.scorebook/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&home_dir())
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".scorebook").join("config.json")
    }

    /// Load from an explicit path. Returns `Default` when the file is absent
    /// or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                Self::default()
            }
        }
    }

    /// Atomically write the config, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge in the persisted config where no explicit
    /// CLI value was provided.
    pub fn load_with_config() -> Self {
        Self::load_with_config_impl(
            std::env::args_os().collect(),
            &ScorebookConfig::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_config_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);
        let config = ScorebookConfig::load_from(config_path);

        // CLI (and env) always win over the file.
        if settings.data_dir.is_none() {
            settings.data_dir = config.data_dir.clone();
        }
        if !is_arg_explicitly_set(&matches, "log_level") {
            if let Some(level) = config.log_level.clone() {
                settings.log_level = level;
            }
        }
        if let Some(top) = config.default_top {
            settings.default_top = top;
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.save_config {
            let to_save = ScorebookConfig::from(&settings);
            if let Err(e) = to_save.save_to(config_path) {
                tracing::warn!(error = %e, "failed to save config");
            }
        }

        settings
    }

    /// Directory to read scorecards from: `--data-dir`, then the config file,
    /// then `~/.scorebook/data`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".scorebook").join("data"))
    }

    /// Leaderboard size for a command that may carry its own `--top`.
    pub fn effective_top(&self, top: Option<usize>) -> usize {
        top.unwrap_or(self.default_top)
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for ScorebookConfig {
    fn from(s: &Settings) -> Self {
        ScorebookConfig {
            data_dir: s.data_dir.clone(),
            default_top: Some(s.effective_top(match &s.command {
                Command::Leaderboard { top, .. } | Command::Report { top, .. } => *top,
                _ => None,
            })),
            log_level: Some(s.log_level.clone()),
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
