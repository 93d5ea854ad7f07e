mod common;

use common::raw;
use league_flat::fields::{Field, FieldCatalog, TableKind};
use league_flat::frame::{CanonicalTable, RawTable};
use league_flat::join::{OutputSchema, join_all, join_header};
use league_flat::normalize::resolve_and_normalize;
use league_flat::resolve::ColumnMap;

struct Prepared {
    maps: [ColumnMap; 4],
    tables: [CanonicalTable; 4],
}

fn prepare(
    header: &RawTable,
    teams: &RawTable,
    players: &RawTable,
    box_score: &RawTable,
) -> Prepared {
    let catalog = FieldCatalog::default();
    let run = |table: &RawTable, kind: TableKind| {
        resolve_and_normalize(table, kind, catalog.table(kind)).expect("normalize")
    };
    let (hm, ht) = run(header, TableKind::Header);
    let (tm, tt) = run(teams, TableKind::Teams);
    let (pm, pt) = run(players, TableKind::Players);
    let (bm, bt) = run(box_score, TableKind::BoxScore);
    Prepared {
        maps: [hm, tm, pm, bm],
        tables: [ht, tt, pt, bt],
    }
}

impl Prepared {
    fn schema(&self) -> OutputSchema {
        OutputSchema::from_maps(&self.maps[0], &self.maps[1], &self.maps[3])
    }
}

fn default_players() -> RawTable {
    raw(
        &["player_id", "player_name"],
        &[&["P1", "Campazzo"], &["P2", "Vezenkov"]],
    )
}

#[test]
fn two_players_in_one_game_share_the_game_date() {
    let prepared = prepare(
        &raw(
            &["game_id", "date", "season"],
            &[&["G1", "2023-10-05", "2023"]],
        ),
        &raw(&["team_id", "team_name"], &[&["RMB", "Real Madrid"]]),
        &default_players(),
        &raw(&["game_id", "player_id"], &[&["G1", "P1"], &["G1", "P2"]]),
    );
    let [_, teams, players, box_score] = &prepared.tables;
    let records = join_all(prepared.schema(), box_score, &prepared.tables[0], teams, players);
    assert_eq!(records.len(), 2);
    for record in &records.records {
        assert_eq!(record.game_date.as_deref(), Some("2023-10-05"));
    }
    assert_eq!(records.records[1].player_name.as_deref(), Some("Vezenkov"));
    assert_eq!(
        records.headers(),
        vec!["game_id", "game_date", "player_id", "player_name"]
    );
}

#[test]
fn teams_without_names_emit_no_player_team_column() {
    let prepared = prepare(
        &raw(
            &["game_id", "date", "season"],
            &[&["G1", "2023-10-05", "2023"]],
        ),
        &raw(&["team_id", "city"], &[&["RMB", "Madrid"]]),
        &default_players(),
        &raw(&["game_id", "player_id", "team_id"], &[&["G1", "P1", "RMB"]]),
    );
    let schema = prepared.schema();
    assert!(!schema.player_team_name);
    assert!(!schema.contains(Field::PlayerTeamName));
    let [header, teams, players, box_score] = &prepared.tables;
    let records = join_all(schema, box_score, header, teams, players);
    assert!(!records.headers().iter().any(|h| h == "player_team_name"));
}

#[test]
fn box_rows_without_team_id_skip_the_teams_join() {
    let prepared = prepare(
        &raw(&["game_id", "date", "season"], &[&["G1", "d", "1"]]),
        &raw(&["team_id", "team_name"], &[&["RMB", "Real Madrid"]]),
        &default_players(),
        &raw(&["game_id", "player_id"], &[&["G1", "P1"]]),
    );
    assert!(!prepared.schema().contains(Field::PlayerTeamName));
}

#[test]
fn player_team_name_comes_from_box_team_id() {
    let prepared = prepare(
        &raw(&["game_id", "date", "season"], &[&["G1", "d", "1"]]),
        &raw(
            &["TEAM_ID", "Team"],
            &[&["RMB", "Real Madrid"], &["OLY", "Olympiacos"]],
        ),
        &default_players(),
        &raw(
            &["game_id", "player_id", "TeamId"],
            &[&["G1", "P1", "OLY"], &["G1", "P2", ""]],
        ),
    );
    let [header, teams, players, box_score] = &prepared.tables;
    let records = join_all(prepared.schema(), box_score, header, teams, players);
    assert_eq!(
        records.records[0].player_team_name.as_deref(),
        Some("Olympiacos")
    );
    assert_eq!(records.records[1].player_team_name, None);
}

#[test]
fn team_codes_in_header_do_not_produce_team_names() {
    let prepared = prepare(
        &raw(
            &["game_id", "date", "season", "home_team_code", "away_team_code"],
            &[&["G1", "2023-10-05", "2023", "RMB", "OLY"]],
        ),
        &raw(
            &["team_id", "team_name"],
            &[&["RMB", "Real Madrid"], &["OLY", "Olympiacos"]],
        ),
        &default_players(),
        &raw(&["game_id", "player_id", "PTS"], &[&["G1", "P1", "12"]]),
    );
    let schema = prepared.schema();
    assert!(!schema.player_team_name);
    let [header, teams, players, box_score] = &prepared.tables;
    let records = join_all(schema, box_score, header, teams, players);
    assert_eq!(
        records.headers(),
        vec!["game_id", "game_date", "player_id", "player_name", "pts"]
    );
    let record = &records.records[0];
    assert_eq!(record.home_team_name, None);
    assert_eq!(record.away_team_name, None);
    assert_eq!(record.player_team_name, None);
}

#[test]
fn unmatched_keys_surface_as_nulls() {
    let prepared = prepare(
        &raw(
            &["game_id", "date", "season", "home_team"],
            &[&["G1", "2023-10-05", "2023", "Real Madrid"]],
        ),
        &raw(&["team_id", "team_name"], &[&["RMB", "Real Madrid"]]),
        &default_players(),
        &raw(
            &["game_id", "player_id", "PTS"],
            &[&["G9", "P1", "4"], &["", "", "2"]],
        ),
    );
    let [header, teams, players, box_score] = &prepared.tables;
    let records = join_all(prepared.schema(), box_score, header, teams, players);
    assert_eq!(records.len(), 2);
    let rows: Vec<Vec<String>> = records.rows().collect();
    assert_eq!(
        records.headers(),
        vec!["game_id", "game_date", "home_team_name", "player_id", "player_name", "pts"]
    );
    assert_eq!(rows[0], vec!["G9", "", "", "P1", "Campazzo", "4"]);
    assert_eq!(rows[1], vec!["", "", "", "", "", "2"]);
}

#[test]
fn header_step_preserves_box_row_count() {
    let prepared = prepare(
        &raw(
            &["game_id", "date", "season"],
            &[&["G1", "a", "1"], &["G1", "b", "1"], &["G2", "c", "1"]],
        ),
        &raw(&["team_id"], &[]),
        &default_players(),
        &raw(
            &["game_id", "player_id"],
            &[&["G1", "P1"], &["G2", "P1"], &["G3", "P2"], &["G1", "P2"]],
        ),
    );
    let rows = join_header(&prepared.schema(), &prepared.tables[3], &prepared.tables[0]);
    assert_eq!(rows.len(), 4);
    let dates: Vec<Option<&str>> = rows.iter().map(|r| r.record.game_date.as_deref()).collect();
    assert_eq!(dates, vec![Some("a"), Some("c"), None, Some("a")]);
}
