//! Left-joins the canonical tables into one flat record per box-score row.
//!
//! The box-score table drives every step:
//!
//! 1. header, on `game_id`
//! 2. teams, on `team_id` (only when the box score carries a team id and the
//!    teams table a name)
//! 3. players, on `player_id`
//!
//! Secondary tables are reduced to one row per join key before probing (the
//! first row for a key wins), so the output always has exactly as many rows
//! as the box-score table. Empty keys never match.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::Serialize;

use crate::{fields::Field, frame::CanonicalTable, resolve::ColumnMap};

/// Output columns present for this run, decided once from the column maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSchema {
    pub fields: Vec<Field>,
    pub player_team_name: bool,
}

impl OutputSchema {
    pub fn from_maps(header: &ColumnMap, teams: &ColumnMap, box_score: &ColumnMap) -> Self {
        let player_team_name =
            teams.is_resolved(Field::TeamName) && box_score.is_resolved(Field::TeamId);

        let mut fields = vec![Field::GameId, Field::GameDate];
        for optional in [
            Field::GameTime,
            Field::HomeTeamName,
            Field::AwayTeamName,
            Field::HomeScore,
            Field::AwayScore,
        ] {
            if header.is_resolved(optional) {
                fields.push(optional);
            }
        }
        fields.extend([Field::PlayerId, Field::PlayerName]);
        if player_team_name {
            fields.push(Field::PlayerTeamName);
        }
        for stat in [Field::Pts, Field::Ast, Field::Reb] {
            if box_score.is_resolved(stat) {
                fields.push(stat);
            }
        }

        Self {
            fields,
            player_team_name,
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.as_str().to_string()).collect()
    }
}

/// One game/player pairing. Empty source cells and unmatched joins are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatRecord {
    pub game_id: Option<String>,
    pub game_date: Option<String>,
    pub game_time: Option<String>,
    pub home_team_name: Option<String>,
    pub away_team_name: Option<String>,
    pub home_score: Option<String>,
    pub away_score: Option<String>,
    pub player_id: Option<String>,
    pub player_name: Option<String>,
    pub player_team_name: Option<String>,
    pub pts: Option<String>,
    pub ast: Option<String>,
    pub reb: Option<String>,
}

impl FlatRecord {
    pub fn value(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::GameId => &self.game_id,
            Field::GameDate => &self.game_date,
            Field::GameTime => &self.game_time,
            Field::HomeTeamName => &self.home_team_name,
            Field::AwayTeamName => &self.away_team_name,
            Field::HomeScore => &self.home_score,
            Field::AwayScore => &self.away_score,
            Field::PlayerId => &self.player_id,
            Field::PlayerName => &self.player_name,
            Field::PlayerTeamName => &self.player_team_name,
            Field::Pts => &self.pts,
            Field::Ast => &self.ast,
            Field::Reb => &self.reb,
            _ => return None,
        };
        slot.as_deref()
    }

    pub fn to_row(&self, fields: &[Field]) -> Vec<String> {
        fields
            .iter()
            .map(|field| self.value(*field).unwrap_or_default().to_string())
            .collect()
    }
}

/// A record mid-join, still carrying the keys later steps probe with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinedRow {
    pub record: FlatRecord,
    team_id: Option<String>,
}

/// The immutable join result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    pub schema: OutputSchema,
    pub records: Vec<FlatRecord>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        self.schema.headers()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records
            .iter()
            .map(|record| record.to_row(&self.schema.fields))
    }
}

struct Lookup<'a> {
    table: &'a CanonicalTable,
    rows: HashMap<&'a str, usize>,
}

impl<'a> Lookup<'a> {
    fn build(table: &'a CanonicalTable, key: Field, label: &str) -> Self {
        let mut rows: HashMap<&'a str, usize> = HashMap::new();
        let mut conflicts = 0usize;
        if let Some(column) = table.column(key) {
            for (idx, row) in table.rows.iter().enumerate() {
                let Some(value) = row.get(column).map(|s| s.as_str()).filter(|s| !s.is_empty())
                else {
                    continue;
                };
                match rows.get(value) {
                    Some(existing) if table.rows[*existing] != *row => conflicts += 1,
                    Some(_) => {}
                    None => {
                        rows.insert(value, idx);
                    }
                }
            }
        }
        if conflicts > 0 {
            warn!(
                "{label}: {conflicts} row(s) reuse an existing {key}; keeping the first row per key"
            );
        }
        debug!("{label}: {} distinct {key} value(s)", rows.len());
        Self { table, rows }
    }

    fn get(&self, key: Option<&str>, field: Field) -> Option<String> {
        let row = *self.rows.get(key?)?;
        self.table.value(row, field).map(str::to_string)
    }

    fn contains(&self, key: Option<&str>) -> bool {
        key.is_some_and(|k| self.rows.contains_key(k))
    }
}

fn owned(table: &CanonicalTable, row: usize, field: Field) -> Option<String> {
    table.value(row, field).map(str::to_string)
}

/// Step 1: every box-score row, enriched with its game's header fields.
pub fn join_header(
    schema: &OutputSchema,
    box_score: &CanonicalTable,
    header: &CanonicalTable,
) -> Vec<JoinedRow> {
    let games = Lookup::build(header, Field::GameId, "header");
    let mut matched = 0usize;
    let rows: Vec<JoinedRow> = (0..box_score.row_count())
        .map(|idx| {
            let game_id = owned(box_score, idx, Field::GameId);
            let game = game_id.as_deref();
            if games.contains(game) {
                matched += 1;
            }
            let from_header = |field: Field| {
                if schema.contains(field) {
                    games.get(game, field)
                } else {
                    None
                }
            };
            let record = FlatRecord {
                game_date: games.get(game, Field::GameDate),
                game_time: from_header(Field::GameTime),
                home_team_name: from_header(Field::HomeTeamName),
                away_team_name: from_header(Field::AwayTeamName),
                home_score: from_header(Field::HomeScore),
                away_score: from_header(Field::AwayScore),
                player_id: owned(box_score, idx, Field::PlayerId),
                pts: owned(box_score, idx, Field::Pts),
                ast: owned(box_score, idx, Field::Ast),
                reb: owned(box_score, idx, Field::Reb),
                game_id: game_id.clone(),
                ..FlatRecord::default()
            };
            JoinedRow {
                record,
                team_id: owned(box_score, idx, Field::TeamId),
            }
        })
        .collect();
    debug!(
        "header join: {matched} of {} box-score row(s) matched a game",
        rows.len()
    );
    rows
}

/// Step 2: the player's team name by the box-score team id. Skipped entirely
/// unless the schema emits `player_team_name`.
pub fn join_teams(schema: &OutputSchema, rows: &mut [JoinedRow], teams: &CanonicalTable) {
    if !schema.player_team_name {
        debug!("teams join skipped");
        return;
    }
    let lookup = Lookup::build(teams, Field::TeamId, "teams");
    for row in rows.iter_mut() {
        row.record.player_team_name = lookup.get(row.team_id.as_deref(), Field::TeamName);
    }
}

/// Step 3: player names by id.
pub fn join_players(rows: &mut [JoinedRow], players: &CanonicalTable) {
    let lookup = Lookup::build(players, Field::PlayerId, "players");
    let mut unmatched = 0usize;
    for row in rows.iter_mut() {
        row.record.player_name = lookup.get(row.record.player_id.as_deref(), Field::PlayerName);
        if !lookup.contains(row.record.player_id.as_deref()) {
            unmatched += 1;
        }
    }
    if unmatched > 0 {
        debug!("players join: {unmatched} row(s) without a matching player");
    }
}

pub fn join_all(
    schema: OutputSchema,
    box_score: &CanonicalTable,
    header: &CanonicalTable,
    teams: &CanonicalTable,
    players: &CanonicalTable,
) -> RecordSet {
    let mut rows = join_header(&schema, box_score, header);
    join_teams(&schema, &mut rows, teams);
    join_players(&mut rows, players);
    info!(
        "Join complete: {} output row(s), {} column(s)",
        rows.len(),
        schema.fields.len()
    );
    RecordSet {
        records: rows.into_iter().map(|row| row.record).collect(),
        schema,
    }
}
