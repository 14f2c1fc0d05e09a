//! File-backed raw score provider.
//!
//! Reads a club data directory laid out as:
//!
//! ```text
//! <root>/members.json         [{ "id": 1, "name": "A. Cook" }, ...]
//! <root>/seasons.json         [{ "id": 2024, "name": "2024", "start_date": "2024-04-01", "end_date": "2024-09-30" }, ...]
//! <root>/fixtures/**/*.json   one finalised scorecard per file
//! ```
//!
//! A scorecard's season is its explicit `season_id`, or else the season whose
//! date range contains the fixture `date`. Everything is loaded once by
//! [`FileScoreProvider::open`]; a malformed file fails the load.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use scorebook_core::error::{Result, StatsError};
use scorebook_core::models::{
    BattingRow, BowlingRow, FixtureId, Member, MemberId, Season, SeasonId, TeamId,
};
use scorebook_core::overs::Overs;
use scorebook_core::provider::RawScoreProvider;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

const MEMBERS_FILE: &str = "members.json";
const SEASONS_FILE: &str = "seasons.json";
const FIXTURES_DIR: &str = "fixtures";

// ── On-disk shapes ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ScorecardFile {
    fixture_id: FixtureId,
    #[serde(default)]
    season_id: Option<SeasonId>,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    innings: Vec<InningsRecord>,
}

#[derive(Debug, Deserialize)]
struct InningsRecord {
    batting_team_id: TeamId,
    bowling_team_id: TeamId,
    #[serde(default)]
    batting: Vec<BatterRecord>,
    #[serde(default)]
    bowling: Vec<BowlerRecord>,
}

#[derive(Debug, Deserialize)]
struct BatterRecord {
    member_id: MemberId,
    runs: i32,
    #[serde(default)]
    balls: i32,
    #[serde(default)]
    fours: i32,
    #[serde(default)]
    sixes: i32,
    is_out: bool,
}

#[derive(Debug, Deserialize)]
struct BowlerRecord {
    member_id: MemberId,
    overs: OversValue,
    #[serde(default)]
    maidens: i32,
    runs_conceded: i32,
    #[serde(default)]
    wickets: i32,
    #[serde(default)]
    no_balls: i32,
    #[serde(default)]
    wides: i32,
}

/// Overs may be written as a JSON number (`4.3`) or string (`"4.3"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OversValue {
    Number(f64),
    Text(String),
}

impl OversValue {
    /// Validate either form once, annotating failures with the file.
    fn to_overs(&self, path: &Path) -> Result<Overs> {
        let parsed = match self {
            OversValue::Number(n) => Overs::from_notation(*n),
            OversValue::Text(s) => s.parse::<Overs>(),
        };
        parsed.map_err(|e| match e {
            StatsError::MalformedOvers { overs, reason } => StatsError::MalformedOvers {
                overs,
                reason: format!("{reason} in {}", path.display()),
            },
            other => other,
        })
    }
}

/// Rows from one scorecard, tagged with the resolved season.
#[derive(Debug, Clone)]
struct LoadedFixture {
    season: Option<SeasonId>,
    batting: Vec<BattingRow>,
    bowling: Vec<BowlingRow>,
}

// ── FileScoreProvider ─────────────────────────────────────────────────────────

/// [`RawScoreProvider`] over a directory of JSON scorecards.
#[derive(Debug, Clone)]
pub struct FileScoreProvider {
    root: PathBuf,
    members: HashMap<MemberId, String>,
    seasons: Vec<Season>,
    known_seasons: BTreeSet<SeasonId>,
    fixtures: Vec<LoadedFixture>,
}

impl FileScoreProvider {
    /// Load every reference file and scorecard under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StatsError::DataPathNotFound(root));
        }

        let members: Vec<Member> = read_optional(&root.join(MEMBERS_FILE))?;
        let seasons: Vec<Season> = read_optional(&root.join(SEASONS_FILE))?;

        let mut known_seasons: BTreeSet<SeasonId> = seasons.iter().map(|s| s.id).collect();
        let mut fixtures = Vec::new();
        let mut seen: HashMap<FixtureId, PathBuf> = HashMap::new();

        for path in find_scorecard_files(&root.join(FIXTURES_DIR))? {
            let card: ScorecardFile = read_json(&path)?;
            if let Some(first) = seen.insert(card.fixture_id, path.clone()) {
                return Err(StatsError::invalid(format!(
                    "fixture {} appears in both {} and {}",
                    card.fixture_id,
                    first.display(),
                    path.display()
                )));
            }
            let fixture = load_fixture(card, &seasons, &path)?;
            if let Some(season) = fixture.season {
                known_seasons.insert(season);
            }
            fixtures.push(fixture);
        }

        debug!(
            root = %root.display(),
            members = members.len(),
            seasons = known_seasons.len(),
            fixtures = fixtures.len(),
            "loaded scorebook data"
        );

        Ok(Self {
            root,
            members: members.into_iter().map(|m| (m.id, m.name)).collect(),
            seasons,
            known_seasons,
            fixtures,
        })
    }

    /// Directory this provider was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Seasons declared in `seasons.json`.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Number of scorecards loaded.
    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    fn in_scope(&self, season: Option<SeasonId>) -> Result<impl Iterator<Item = &LoadedFixture>> {
        if let Some(id) = season {
            if !self.known_seasons.contains(&id) {
                return Err(StatsError::SeasonNotFound(id));
            }
        }
        Ok(self
            .fixtures
            .iter()
            .filter(move |f| season.is_none() || f.season == season))
    }
}

impl RawScoreProvider for FileScoreProvider {
    fn batting_rows(&self, season: Option<SeasonId>) -> Result<Vec<BattingRow>> {
        Ok(self
            .in_scope(season)?
            .flat_map(|f| f.batting.iter().cloned())
            .collect())
    }

    fn bowling_rows(&self, season: Option<SeasonId>) -> Result<Vec<BowlingRow>> {
        Ok(self
            .in_scope(season)?
            .flat_map(|f| f.bowling.iter().cloned())
            .collect())
    }

    fn member_names(&self) -> Result<HashMap<MemberId, String>> {
        Ok(self.members.clone())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// All `.json` files under `dir`, sorted by path. An entry that cannot be
/// read fails the load.
fn find_scorecard_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        warn!("Fixtures directory does not exist: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|err| StatsError::FileRead {
            path: err.path().unwrap_or(dir).to_path_buf(),
            source: err.into(),
        })?;
        let is_json = entry
            .path()
            .extension()
            .map(|ext| ext == "json")
            .unwrap_or(false);
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| StatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StatsError::ScorecardParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_json`] but an absent file yields `T::default()`.
fn read_optional<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!("{} not present; using empty list", path.display());
        return Ok(T::default());
    }
    read_json(path)
}

fn resolve_season(card: &ScorecardFile, seasons: &[Season], path: &Path) -> Option<SeasonId> {
    if card.season_id.is_some() {
        return card.season_id;
    }
    let resolved = card
        .date
        .and_then(|date| seasons.iter().find(|s| s.contains(date)).map(|s| s.id));
    if resolved.is_none() {
        warn!(
            "Fixture {} in {} has no season; it counts towards career totals only",
            card.fixture_id,
            path.display()
        );
    }
    resolved
}

fn load_fixture(card: ScorecardFile, seasons: &[Season], path: &Path) -> Result<LoadedFixture> {
    let season = resolve_season(&card, seasons, path);
    let mut batting = Vec::new();
    let mut bowling = Vec::new();

    for innings in &card.innings {
        batting.extend(innings.batting.iter().map(|b| BattingRow {
            fixture_id: card.fixture_id,
            team_id: innings.batting_team_id,
            member_id: b.member_id,
            runs: b.runs,
            balls: b.balls,
            fours: b.fours,
            sixes: b.sixes,
            is_out: b.is_out,
        }));
        for b in &innings.bowling {
            bowling.push(BowlingRow {
                fixture_id: card.fixture_id,
                team_id: innings.bowling_team_id,
                member_id: b.member_id,
                overs: b.overs.to_overs(path)?.as_notation(),
                maidens: b.maidens,
                runs_conceded: b.runs_conceded,
                wickets: b.wickets,
                no_balls: b.no_balls,
                wides: b.wides,
            });
        }
    }

    Ok(LoadedFixture {
        season,
        batting,
        bowling,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, value: &serde_json::Value) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, value.to_string()).unwrap();
    }

    fn scorecard(fixture_id: i64, date: &str, batter: i64, runs: i32, bowler: i64) -> serde_json::Value {
        json!({
            "fixture_id": fixture_id,
            "date": date,
            "innings": [{
                "batting_team_id": 1,
                "bowling_team_id": 2,
                "batting": [{ "member_id": batter, "runs": runs, "balls": 30, "is_out": true }],
                "bowling": [{ "member_id": bowler, "overs": "4.3", "runs_conceded": 22, "wickets": 2 }]
            }]
        })
    }

    fn club_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            MEMBERS_FILE,
            &json!([{ "id": 1, "name": "A. Cook" }, { "id": 2, "name": "J. Anderson" }]),
        );
        write(
            dir.path(),
            SEASONS_FILE,
            &json!([
                { "id": 2023, "name": "2023", "start_date": "2023-04-01", "end_date": "2023-09-30" },
                { "id": 2024, "name": "2024", "start_date": "2024-04-01", "end_date": "2024-09-30" }
            ]),
        );
        write(dir.path(), "fixtures/2023/f1.json", &scorecard(1, "2023-05-06", 1, 40, 2));
        write(dir.path(), "fixtures/2024/f2.json", &scorecard(2, "2024-06-01", 1, 75, 2));
        dir
    }

    #[test]
    fn test_open_loads_everything() {
        let dir = club_dir();
        let provider = FileScoreProvider::open(dir.path()).unwrap();
        assert_eq!(provider.fixture_count(), 2);
        assert_eq!(provider.seasons().len(), 2);
        assert_eq!(provider.root(), dir.path());

        let names = provider.member_names().unwrap();
        assert_eq!(names.get(&2).map(String::as_str), Some("J. Anderson"));
    }

    #[test]
    fn test_season_filter_by_date_range() {
        let dir = club_dir();
        let provider = FileScoreProvider::open(dir.path()).unwrap();

        let career = provider.batting_rows(None).unwrap();
        assert_eq!(career.len(), 2);

        let season = provider.batting_rows(Some(2024)).unwrap();
        assert_eq!(season.len(), 1);
        assert_eq!(season[0].runs, 75);
        assert_eq!(season[0].fixture_id, 2);
    }

    #[test]
    fn test_explicit_season_id_wins_over_date() {
        let dir = club_dir();
        let mut card = scorecard(3, "2024-06-08", 1, 10, 2);
        card["season_id"] = json!(2023);
        write(dir.path(), "fixtures/odd.json", &card);

        let provider = FileScoreProvider::open(dir.path()).unwrap();
        assert_eq!(provider.batting_rows(Some(2023)).unwrap().len(), 2);
    }

    #[test]
    fn test_overs_string_and_number_accepted() {
        let dir = club_dir();
        let mut card = scorecard(4, "2024-07-01", 1, 10, 2);
        card["innings"][0]["bowling"][0]["overs"] = json!(3.2);
        write(dir.path(), "fixtures/num.json", &card);

        let provider = FileScoreProvider::open(dir.path()).unwrap();
        let rows = provider.bowling_rows(Some(2024)).unwrap();
        let overs: Vec<f64> = rows.iter().map(|r| r.overs).collect();
        assert_eq!(rows.len(), 2);
        assert!(overs.iter().any(|o| (o - 4.3).abs() < 1e-9));
        assert!(overs.iter().any(|o| (o - 3.2).abs() < 1e-9));
        assert!(rows.iter().all(|r| r.team_id == 2));
    }

    #[test]
    fn test_malformed_overs_fails_load() {
        for (name, overs) in [("bad_text.json", json!("4.7")), ("bad_number.json", json!(4.7))] {
            let dir = club_dir();
            let mut card = scorecard(5, "2024-07-01", 1, 10, 2);
            card["innings"][0]["bowling"][0]["overs"] = overs;
            write(dir.path(), &format!("fixtures/{name}"), &card);

            let err = FileScoreProvider::open(dir.path()).unwrap_err();
            assert!(err.is_invalid_argument(), "{name}: {err}");
            let msg = err.to_string();
            assert!(msg.contains("balls-in-over must be 0-5"), "{msg}");
            assert!(msg.contains(name), "{msg}");
        }
    }

    #[test]
    fn test_overs_stored_as_validated_notation() {
        let dir = club_dir();
        let provider = FileScoreProvider::open(dir.path()).unwrap();
        let rows = provider.bowling_rows(Some(2024)).unwrap();
        assert_eq!(rows[0].overs, Overs::from_balls(27).as_notation());
        assert_eq!(Overs::from_notation(rows[0].overs).unwrap().balls(), 27);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_fixture_entry_fails_load() {
        let dir = club_dir();
        std::os::unix::fs::symlink(
            dir.path().join("nowhere"),
            dir.path().join("fixtures/dangling.json"),
        )
        .unwrap();
        let err = FileScoreProvider::open(dir.path()).unwrap_err();
        assert!(matches!(err, StatsError::FileRead { .. }), "{err}");
    }

    #[test]
    fn test_unparseable_scorecard_fails_load() {
        let dir = club_dir();
        std::fs::write(dir.path().join("fixtures/broken.json"), "{ not json").unwrap();
        let err = FileScoreProvider::open(dir.path()).unwrap_err();
        assert!(matches!(err, StatsError::ScorecardParse { .. }));
    }

    #[test]
    fn test_duplicate_fixture_fails_load() {
        let dir = club_dir();
        write(dir.path(), "fixtures/dup.json", &scorecard(1, "2023-05-06", 1, 40, 2));
        assert!(FileScoreProvider::open(dir.path()).is_err());
    }

    #[test]
    fn test_unknown_season_is_error() {
        let dir = club_dir();
        let provider = FileScoreProvider::open(dir.path()).unwrap();
        let err = provider.bowling_rows(Some(1999)).unwrap_err();
        assert!(matches!(err, StatsError::SeasonNotFound(1999)));
    }

    #[test]
    fn test_fixture_outside_any_season_is_career_only() {
        let dir = club_dir();
        write(dir.path(), "fixtures/winter.json", &scorecard(6, "2024-01-15", 1, 99, 2));
        let provider = FileScoreProvider::open(dir.path()).unwrap();
        assert_eq!(provider.batting_rows(None).unwrap().len(), 3);
        assert_eq!(provider.batting_rows(Some(2024)).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let err = FileScoreProvider::open("/definitely/not/here").unwrap_err();
        assert!(matches!(err, StatsError::DataPathNotFound(_)));
    }

    #[test]
    fn test_empty_root_has_no_rows() {
        let dir = TempDir::new().unwrap();
        let provider = FileScoreProvider::open(dir.path()).unwrap();
        assert!(provider.batting_rows(None).unwrap().is_empty());
        assert!(provider.member_names().unwrap().is_empty());
    }

    #[test]
    fn test_non_json_files_ignored() {
        let dir = club_dir();
        std::fs::write(dir.path().join("fixtures/notes.txt"), "rain stopped play").unwrap();
        let provider = FileScoreProvider::open(dir.path()).unwrap();
        assert_eq!(provider.fixture_count(), 2);
    }
}
