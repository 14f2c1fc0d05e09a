//! Plain-text rendering of summaries and leaderboards.

use scorebook_core::formatting::{display_or_dash, format_count, format_metric, format_number};
use scorebook_core::models::{BattingSummary, BowlingSummary, LeaderboardEntry};
use unicode_width::UnicodeWidthStr;

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

// ── Per-member cards ──────────────────────────────────────────────────────────

pub fn batting_card(name: &str, s: &BattingSummary) -> String {
    let average = if s.unbeaten {
        format!("{} (unbeaten)", format_metric(s.average))
    } else {
        format_metric(s.average)
    };
    key_values(
        &format!("Batting: {name}"),
        &[
            ("Innings", format_count(s.innings)),
            ("Not outs", format_count(s.not_outs)),
            ("Runs", format_count(s.total_runs)),
            ("Balls", format_count(s.total_balls)),
            ("Highest", display_or_dash(s.highest_score)),
            ("Average", average),
            ("Strike rate", format_number(s.strike_rate, 2)),
            ("100s / 50s", format!("{} / {}", s.centuries, s.half_centuries)),
            ("4s / 6s", format!("{} / {}", s.total_fours, s.total_sixes)),
            ("Ducks", format_count(s.ducks)),
        ],
    )
}

pub fn bowling_card(name: &str, s: &BowlingSummary) -> String {
    key_values(
        &format!("Bowling: {name}"),
        &[
            ("Innings", format_count(s.innings)),
            ("Overs", s.overs_display.clone()),
            ("Maidens", format_count(s.maidens)),
            ("Runs", format_count(s.runs_conceded)),
            ("Wickets", format_count(s.wickets)),
            ("Best", display_or_dash(s.best_figures)),
            ("Average", format_metric(s.average)),
            ("Economy", format_metric(s.economy)),
            ("Strike rate", format_metric(s.strike_rate)),
            ("5w", format_count(s.five_wicket_hauls)),
            ("Wides / no-balls", format!("{} / {}", s.wides, s.no_balls)),
        ],
    )
}

// ── Leaderboards ──────────────────────────────────────────────────────────────

pub fn batting_board(title: &str, entries: &[LeaderboardEntry<BattingSummary>]) -> String {
    let headers = ["#", "Player", "Inns", "NO", "Runs", "HS", "Avg", "SR", "100", "50"];
    let rows = entries
        .iter()
        .map(|e| {
            let s = &e.stats;
            vec![
                e.rank.to_string(),
                e.member_name.clone(),
                s.innings.to_string(),
                s.not_outs.to_string(),
                format_count(s.total_runs),
                display_or_dash(s.highest_score),
                format_metric(s.average),
                format_number(s.strike_rate, 2),
                s.centuries.to_string(),
                s.half_centuries.to_string(),
            ]
        })
        .collect();
    titled(title, &table(&headers, rows))
}

pub fn bowling_board(title: &str, entries: &[LeaderboardEntry<BowlingSummary>]) -> String {
    let headers = ["#", "Player", "Overs", "M", "Runs", "Wkts", "Best", "Avg", "Econ", "SR", "5w"];
    let rows = entries
        .iter()
        .map(|e| {
            let s = &e.stats;
            vec![
                e.rank.to_string(),
                e.member_name.clone(),
                s.overs_display.clone(),
                s.maidens.to_string(),
                format_count(s.runs_conceded),
                s.wickets.to_string(),
                display_or_dash(s.best_figures),
                format_metric(s.average),
                format_metric(s.economy),
                format_metric(s.strike_rate),
                s.five_wicket_hauls.to_string(),
            ]
        })
        .collect();
    titled(title, &table(&headers, rows))
}

// ── Layout helpers ────────────────────────────────────────────────────────────

fn titled(title: &str, body: &str) -> String {
    format!("{title}\n{}\n{body}", "=".repeat(title.width()))
}

fn key_values(title: &str, pairs: &[(&str, String)]) -> String {
    let label_width = pairs.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let body: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}  {}", pad(k, label_width, Align::Left), v))
        .collect();
    titled(title, &body.join("\n"))
}

/// Render rows under headers. The player column (index 1) is left-aligned,
/// every other column right-aligned.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return "(no entries)".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    let align = |col: usize| if col == 1 { Align::Left } else { Align::Right };

    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths[i], align(i)))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// Pad by display width so names with accents or wide glyphs line up.
fn pad(s: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(s.width()));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::formatting::UNDEFINED_METRIC;
    use scorebook_core::models::{BestFigures, HighScore};

    fn batting_entry(rank: u32, name: &str, runs: u32, average: Option<f64>) -> LeaderboardEntry<BattingSummary> {
        let mut stats = BattingSummary::empty(rank as i64);
        stats.innings = 3;
        stats.total_runs = runs;
        stats.average = average;
        stats.highest_score = Some(HighScore { runs: 60, not_out: true });
        LeaderboardEntry {
            rank,
            member_id: rank as i64,
            member_name: name.to_string(),
            primary_value: f64::from(runs),
            secondary_keys: vec![average, Some(0.0)],
            stats,
        }
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("Zoë", 5, Align::Left), "Zoë  ");
        assert_eq!(pad("7", 3, Align::Right), "  7");
        assert_eq!(pad("toolong", 3, Align::Right), "toolong");
    }

    #[test]
    fn test_batting_board_columns_align() {
        let out = batting_board(
            "Batting 2024",
            &[
                batting_entry(1, "A. Cook", 1_250, Some(52.08)),
                batting_entry(2, "Zoë Smith", 90, None),
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Batting 2024");
        assert!(lines[2].starts_with("#  Player"));
        assert!(out.contains("1,250"));
        assert!(out.contains("52.08"));
        assert!(out.contains("60*"));
        assert!(out.contains(UNDEFINED_METRIC));
        // Every data row has the same display width up to the last column.
        let w3 = lines[4].width();
        let w4 = lines[5].width();
        assert_eq!(w3, w4, "{out}");
    }

    #[test]
    fn test_empty_board() {
        let out = bowling_board("Bowling", &[]);
        assert!(out.ends_with("(no entries)"));
    }

    #[test]
    fn test_bowling_card_undefined_metrics() {
        let mut s = BowlingSummary::empty(2);
        s.innings = 1;
        s.total_balls = 27;
        s.overs_display = "4.3".to_string();
        s.runs_conceded = 31;
        s.economy = Some(31.0 / 4.5);
        s.best_figures = Some(BestFigures { wickets: 0, runs: 31 });
        let out = bowling_card("J. Anderson", &s);
        assert!(out.starts_with("Bowling: J. Anderson"));
        assert!(out.contains("4.3"));
        assert!(out.contains("0/31"));
        assert!(out.contains("6.89"));
        assert!(out.contains(UNDEFINED_METRIC));
    }

    #[test]
    fn test_batting_card_unbeaten() {
        let mut s = BattingSummary::empty(1);
        s.innings = 2;
        s.not_outs = 2;
        s.total_runs = 42;
        s.unbeaten = true;
        let out = batting_card("A. Cook", &s);
        assert!(out.contains(&format!("{UNDEFINED_METRIC} (unbeaten)")));
    }
}
