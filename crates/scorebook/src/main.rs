mod bootstrap;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use scorebook_core::models::{fallback_member_name, MemberId, SeasonId};
use scorebook_core::provider::RawScoreProvider;
use scorebook_core::settings::{Category, Command, Settings};
use scorebook_data::reader::FileScoreProvider;
use scorebook_runtime::orchestrator::{SeasonReport, StatsOrchestrator};
use serde::Serialize;

type Stats = StatsOrchestrator<FileScoreProvider>;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_config();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Scorebook v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = settings.resolved_data_dir();
    let provider = FileScoreProvider::open(&data_dir)
        .with_context(|| format!("loading club data from {}", data_dir.display()))?;
    tracing::info!(
        "Loaded {} fixtures from {}",
        provider.fixture_count(),
        data_dir.display()
    );

    let stats = Arc::new(StatsOrchestrator::new(provider));
    let output = run(&settings, stats).await?;
    println!("{output}");

    Ok(())
}

/// Execute the selected subcommand and return the rendered output.
async fn run(settings: &Settings, stats: Arc<Stats>) -> Result<String> {
    let json = settings.format == "json";

    match settings.command.clone() {
        Command::Batting { member, season } => {
            let summary = stats.batting_stats(member, season)?;
            if json {
                return to_json(&summary);
            }
            Ok(render::batting_card(&member_name(&stats, member)?, &summary))
        }

        Command::Bowling { member, season } => {
            let summary = stats.bowling_stats(member, season)?;
            if json {
                return to_json(&summary);
            }
            Ok(render::bowling_card(&member_name(&stats, member)?, &summary))
        }

        Command::Leaderboard {
            category,
            season,
            top,
        } => {
            let top = settings.effective_top(top);
            let title = scope_title(category_name(category), season);
            match category {
                Category::Batting => {
                    let board = stats.batting_leaderboard(season, top)?;
                    if json {
                        return to_json(&board);
                    }
                    Ok(render::batting_board(&title, &board))
                }
                Category::Bowling => {
                    let board = stats.bowling_leaderboard(season, top)?;
                    if json {
                        return to_json(&board);
                    }
                    Ok(render::bowling_board(&title, &board))
                }
            }
        }

        Command::Report { season, top } => {
            let top = settings.effective_top(top);
            let report = concurrent_report(stats, season, top).await?;
            if json {
                return to_json(&report);
            }
            Ok(format!(
                "{}\n\n{}",
                render::batting_board(&scope_title("Batting", season), &report.batting),
                render::bowling_board(&scope_title("Bowling", season), &report.bowling),
            ))
        }
    }
}

/// Build both leaderboards on separate blocking tasks sharing one
/// orchestrator.
async fn concurrent_report(
    stats: Arc<Stats>,
    season: Option<SeasonId>,
    top: usize,
) -> Result<SeasonReport> {
    let batting = {
        let stats = Arc::clone(&stats);
        tokio::task::spawn_blocking(move || stats.batting_leaderboard(season, top))
    };
    let bowling = {
        let stats = Arc::clone(&stats);
        tokio::task::spawn_blocking(move || stats.bowling_leaderboard(season, top))
    };

    let (batting, bowling) = tokio::try_join!(batting, bowling)?;
    Ok(SeasonReport {
        season,
        batting: batting?,
        bowling: bowling?,
    })
}

fn member_name(stats: &Stats, member_id: MemberId) -> Result<String> {
    let mut names = stats.provider().member_names()?;
    Ok(names
        .remove(&member_id)
        .unwrap_or_else(|| fallback_member_name(member_id)))
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Batting => "Batting",
        Category::Bowling => "Bowling",
    }
}

fn scope_title(discipline: &str, season: Option<SeasonId>) -> String {
    match season {
        Some(id) => format!("{discipline}: season {id}"),
        None => format!("{discipline}: career"),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
