mod common;

use common::TestWorkspace;
use league_flat::error::ResolveError;
use league_flat::fields::{Field, FieldCatalog};
use league_flat::pipeline;

const FLAT_HEADER: &str = "game_id,game_date,game_time,home_team_name,away_team_name,\
home_score,away_score,player_id,player_name,player_team_name,pts,ast,reb";

#[test]
fn run_writes_flat_file_and_daily_partitions() {
    let workspace = TestWorkspace::new();
    workspace.write_league();

    let summary = pipeline::run(&workspace.config()).expect("pipeline run");
    assert_eq!(summary.season.as_deref(), Some("2023"));
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.partition_files.len(), 2);

    let flat = workspace.read_output("euroleague_flat.csv");
    let lines: Vec<&str> = flat.lines().collect();
    assert_eq!(
        lines,
        vec![
            FLAT_HEADER,
            "G1,2023-10-05,20:00,Real Madrid,Olympiacos,88,80,P1,Campazzo,Real Madrid,12,7,3",
            "G1,2023-10-05,20:00,Real Madrid,Olympiacos,88,80,P2,Vezenkov,Olympiacos,25,1,9",
            "G2,2023-10-06,19:30,Fenerbahce,Monaco,75,79,P3,Wilbekin,Fenerbahce,18,4,2",
            "G9,,,,,,,P4,,,2,0,1",
        ]
    );

    let day = workspace.read_output("by_day/boxscores_2023-10-05.csv");
    assert_eq!(day.lines().count(), 3);
    assert_eq!(day.lines().next(), Some(FLAT_HEADER));
    assert!(day.lines().skip(1).all(|line| line.starts_with("G1,")));
    let other = workspace.read_output("by_day/boxscores_2023-10-06.csv");
    assert_eq!(other.lines().count(), 2);
}

#[test]
fn missing_season_aborts_before_any_output() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    workspace.write_raw(
        "euroleague_header.csv",
        "game_id,date,team_a,team_b\nG1,2023-10-05,A,B\n",
    );

    let err = pipeline::run(&workspace.config()).unwrap_err();
    let resolve = err
        .downcast_ref::<ResolveError>()
        .expect("resolution error");
    assert!(matches!(resolve, ResolveError::MissingSeasonColumn { .. }));
    assert!(format!("{err:#}").contains("season_code"));
    assert!(!workspace.path().join("data_prepared").exists());
}

#[test]
fn missing_box_player_id_names_the_field() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    workspace.write_raw(
        "euroleague_box_score.csv",
        "game_id,athlete,points\nG1,P1,12\n",
    );

    let err = pipeline::run(&workspace.config()).unwrap_err();
    match err.downcast_ref::<ResolveError>() {
        Some(ResolveError::MissingColumn {
            field, available, ..
        }) => {
            assert_eq!(*field, Field::PlayerId);
            assert!(available.contains(&"athlete".to_string()));
        }
        other => panic!("expected missing column, got {other:?}"),
    }
    assert!(!workspace.output_exists("euroleague_flat.csv"));
}

#[test]
fn no_partitions_only_writes_the_flat_file() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    let mut config = workspace.config();
    config.write_partitions = false;

    let summary = pipeline::run(&config).expect("pipeline run");
    assert!(summary.partition_files.is_empty());
    assert!(workspace.output_exists("euroleague_flat.csv"));
    assert!(!workspace.output_exists("by_day"));
}

#[test]
fn custom_catalog_resolves_provider_specific_labels() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    workspace.write_raw(
        "euroleague_box_score.csv",
        "game_id,player_id,pontos\nG2,P3,18\n",
    );
    let mut catalog = FieldCatalog::default();
    let pts = catalog
        .box_score
        .iter_mut()
        .find(|spec| spec.field == Field::Pts)
        .expect("pts spec");
    pts.candidates.push("pontos".to_string());
    let catalog_path = workspace.path().join("fields.yaml");
    catalog.save(&catalog_path).expect("save catalog");

    let mut config = workspace.config();
    config.catalog = FieldCatalog::load(&catalog_path).expect("load catalog");
    pipeline::run(&config).expect("pipeline run");

    let flat = workspace.read_output("euroleague_flat.csv");
    let mut lines = flat.lines();
    assert_eq!(
        lines.next(),
        Some(
            "game_id,game_date,game_time,home_team_name,away_team_name,home_score,away_score,player_id,player_name,pts"
        )
    );
    assert_eq!(
        lines.next(),
        Some("G2,2023-10-06,19:30,Fenerbahce,Monaco,75,79,P3,Wilbekin,18")
    );
}

#[test]
fn tab_separated_inputs_are_detected_by_extension() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    workspace.write_raw(
        "players.tsv",
        "PlayerId\tPlayer\nP1\tCampazzo\n",
    );
    let mut config = workspace.config();
    config.inputs.players = "players.tsv".to_string();

    let summary = pipeline::run(&config).expect("pipeline run");
    assert_eq!(summary.rows, 4);
    let flat = workspace.read_output("euroleague_flat.csv");
    assert!(flat.contains(",P1,Campazzo,"));
    assert!(flat.contains(",P2,,Olympiacos,"));
}

#[test]
fn teams_join_needs_a_box_score_team_id() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    workspace.write_raw(
        "euroleague_header.csv",
        "game_id,date,season,home_team_code,away_team_code\nG1,2023-10-05,2023,RMB,OLY\n",
    );
    workspace.write_raw(
        "euroleague_box_score.csv",
        "game_id,player_id,PTS\nG1,P1,12\n",
    );

    let summary = pipeline::run(&workspace.config()).expect("pipeline run");
    assert_eq!(
        summary.columns,
        vec!["game_id", "game_date", "player_id", "player_name", "pts"]
    );
    let flat = workspace.read_output("euroleague_flat.csv");
    assert_eq!(flat.lines().nth(1), Some("G1,2023-10-05,P1,Campazzo,12"));
}

#[test]
fn short_rows_are_padded_with_nulls() {
    let workspace = TestWorkspace::new();
    workspace.write_league();
    workspace.write_raw(
        "euroleague_header.csv",
        "game_id,date,season,time\nG1,2023-10-05,2023\nG2,2023-10-06,2023,19:30\n",
    );
    workspace.write_raw(
        "euroleague_box_score.csv",
        "game_id,player_id\nG1,P1\nG2,P3\n",
    );

    let summary = pipeline::run(&workspace.config()).expect("pipeline run");
    assert_eq!(summary.rows, 2);
    let flat = workspace.read_output("euroleague_flat.csv");
    let lines: Vec<&str> = flat.lines().collect();
    assert_eq!(
        lines,
        vec![
            "game_id,game_date,game_time,player_id,player_name",
            "G1,2023-10-05,,P1,Campazzo",
            "G2,2023-10-06,19:30,P3,Wilbekin",
        ]
    );
}
