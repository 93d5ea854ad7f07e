//! Declarative candidate lists mapping provider column labels onto canonical
//! fields.
//!
//! Each input table owns an ordered list of [`FieldSpec`]s. Order inside a
//! spec's `candidates` is priority: the first label present in a table wins.
//! The built-in [`FieldCatalog::default`] covers the provider exports seen so
//! far; a catalog may also be loaded from YAML and is validated against what
//! the join engine needs. The header table lists its season first: without a
//! season the run has nothing to filter on, so that failure is reported ahead
//! of any other missing header column.

use std::{collections::HashSet, fmt, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::ResolveError, yaml_provider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    GameId,
    GameDate,
    GameTime,
    HomeTeamId,
    AwayTeamId,
    HomeTeamName,
    AwayTeamName,
    HomeScore,
    AwayScore,
    Season,
    TeamId,
    TeamName,
    PlayerId,
    PlayerName,
    PlayerTeamName,
    Pts,
    Ast,
    Reb,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::GameId => "game_id",
            Field::GameDate => "game_date",
            Field::GameTime => "game_time",
            Field::HomeTeamId => "home_team_id",
            Field::AwayTeamId => "away_team_id",
            Field::HomeTeamName => "home_team_name",
            Field::AwayTeamName => "away_team_name",
            Field::HomeScore => "home_score",
            Field::AwayScore => "away_score",
            Field::Season => "season",
            Field::TeamId => "team_id",
            Field::TeamName => "team_name",
            Field::PlayerId => "player_id",
            Field::PlayerName => "player_name",
            Field::PlayerTeamName => "player_team_name",
            Field::Pts => "pts",
            Field::Ast => "ast",
            Field::Reb => "reb",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Header,
    Teams,
    Players,
    BoxScore,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Header,
        TableKind::Teams,
        TableKind::Players,
        TableKind::BoxScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Header => "header",
            TableKind::Teams => "teams",
            TableKind::Players => "players",
            TableKind::BoxScore => "box_score",
        }
    }

    /// Fields the join engine cannot run without.
    pub fn required_fields(&self) -> &'static [Field] {
        match self {
            TableKind::Header => &[Field::GameId, Field::GameDate, Field::Season],
            TableKind::Teams => &[Field::TeamId],
            TableKind::Players => &[Field::PlayerId, Field::PlayerName],
            TableKind::BoxScore => &[Field::GameId, Field::PlayerId],
        }
    }

    /// Every field the join engine reads from this table.
    pub fn known_fields(&self) -> &'static [Field] {
        match self {
            TableKind::Header => &[
                Field::GameId,
                Field::GameDate,
                Field::GameTime,
                Field::HomeTeamId,
                Field::AwayTeamId,
                Field::HomeTeamName,
                Field::AwayTeamName,
                Field::HomeScore,
                Field::AwayScore,
                Field::Season,
            ],
            TableKind::Teams => &[Field::TeamId, Field::TeamName],
            TableKind::Players => &[Field::PlayerId, Field::PlayerName, Field::TeamId],
            TableKind::BoxScore => &[
                Field::GameId,
                Field::PlayerId,
                Field::TeamId,
                Field::Pts,
                Field::Ast,
                Field::Reb,
            ],
        }
    }

    /// Dimension tables may list per-game snapshots of the same entity, so
    /// their normalized rows are made distinct before joining.
    pub fn deduplicates(&self) -> bool {
        matches!(self, TableKind::Teams | TableKind::Players)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: Field,
    pub candidates: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    pub fn required(field: Field, candidates: &[&str]) -> Self {
        Self {
            field,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            required: true,
        }
    }

    pub fn optional(field: Field, candidates: &[&str]) -> Self {
        Self {
            field,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            required: false,
        }
    }
}

const GAME_ID_LABELS: &[&str] = &["game_id", "GAME_ID", "Game_ID", "GameId"];
const TEAM_ID_LABELS: &[&str] = &["team_id", "Team_ID", "TEAM_ID", "TeamId"];
const PLAYER_ID_LABELS: &[&str] = &["player_id", "Player_ID", "PLAYER_ID", "PlayerId"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub header: Vec<FieldSpec>,
    pub teams: Vec<FieldSpec>,
    pub players: Vec<FieldSpec>,
    pub box_score: Vec<FieldSpec>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            header: vec![
                FieldSpec::required(
                    Field::Season,
                    &[
                        "season",
                        "Season",
                        "SEASON",
                        "season_code",
                        "SeasonCode",
                        "SEASON_CODE",
                    ],
                ),
                FieldSpec::required(Field::GameId, GAME_ID_LABELS),
                FieldSpec::required(Field::GameDate, &["date", "Date", "GAME_DATE"]),
                FieldSpec::optional(Field::GameTime, &["time", "Time", "GAME_TIME"]),
                FieldSpec::optional(
                    Field::HomeTeamId,
                    &[
                        "home_team_id",
                        "HomeTeamID",
                        "HOME_TEAM_ID",
                        "home_team_code",
                        "HomeTeamCode",
                        "team_id_a",
                    ],
                ),
                FieldSpec::optional(
                    Field::AwayTeamId,
                    &[
                        "away_team_id",
                        "AwayTeamID",
                        "AWAY_TEAM_ID",
                        "away_team_code",
                        "AwayTeamCode",
                        "team_id_b",
                    ],
                ),
                FieldSpec::optional(
                    Field::HomeTeamName,
                    &["home_team", "Home_Team", "home", "HOME", "HomeTeam", "team_a"],
                ),
                FieldSpec::optional(
                    Field::AwayTeamName,
                    &["away_team", "Away_Team", "away", "AWAY", "AwayTeam", "team_b"],
                ),
                FieldSpec::optional(
                    Field::HomeScore,
                    &[
                        "home_score",
                        "Home_Score",
                        "PTS_HOME",
                        "home_pts",
                        "ScoreHome",
                        "score_a",
                    ],
                ),
                FieldSpec::optional(
                    Field::AwayScore,
                    &[
                        "away_score",
                        "Away_Score",
                        "PTS_AWAY",
                        "away_pts",
                        "ScoreAway",
                        "score_b",
                    ],
                ),
            ],
            teams: vec![
                FieldSpec::required(Field::TeamId, TEAM_ID_LABELS),
                FieldSpec::optional(Field::TeamName, &["team_name", "Team", "team", "Team_Name"]),
            ],
            players: vec![
                FieldSpec::required(Field::PlayerId, PLAYER_ID_LABELS),
                FieldSpec::required(
                    Field::PlayerName,
                    &["player_name", "Player", "player", "Player_Name"],
                ),
                FieldSpec::optional(Field::TeamId, TEAM_ID_LABELS),
            ],
            box_score: vec![
                FieldSpec::required(Field::GameId, GAME_ID_LABELS),
                FieldSpec::required(Field::PlayerId, PLAYER_ID_LABELS),
                FieldSpec::optional(Field::TeamId, TEAM_ID_LABELS),
                FieldSpec::optional(Field::Pts, &["PTS", "Points", "pts", "points"]),
                FieldSpec::optional(Field::Ast, &["AST", "Assists", "ast", "assists"]),
                FieldSpec::optional(
                    Field::Reb,
                    &["REB", "TRB", "Rebounds", "reb", "total_rebounds"],
                ),
            ],
        }
    }
}

impl FieldCatalog {
    pub fn table(&self, kind: TableKind) -> &[FieldSpec] {
        match kind {
            TableKind::Header => &self.header,
            TableKind::Teams => &self.teams,
            TableKind::Players => &self.players,
            TableKind::BoxScore => &self.box_score,
        }
    }

    /// Rejects catalogs that drop a join key, mark it optional, declare a
    /// field twice, or declare a field the table never contributes.
    pub fn validate(&self) -> Result<(), ResolveError> {
        for kind in TableKind::ALL {
            let specs = self.table(kind);
            let mut seen = HashSet::new();
            for spec in specs {
                if !kind.known_fields().contains(&spec.field) || !seen.insert(spec.field) {
                    return Err(ResolveError::InvalidCatalog {
                        table: kind,
                        field: spec.field,
                    });
                }
            }
            for field in kind.required_fields() {
                let declared = specs.iter().any(|spec| spec.field == *field && spec.required);
                if !declared {
                    return Err(ResolveError::InvalidCatalog {
                        table: kind,
                        field: *field,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let catalog: FieldCatalog = yaml_provider::load_from_path(path)
            .with_context(|| format!("Parsing field catalog {path:?}"))?;
        catalog
            .validate()
            .with_context(|| format!("Validating field catalog {path:?}"))?;
        Ok(catalog)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        yaml_provider::save_to_path(path, self)
            .with_context(|| format!("Writing field catalog {path:?}"))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        yaml_provider::to_string(self)
    }
}
