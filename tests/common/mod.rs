#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use league_flat::config::PipelineConfig;
use league_flat::frame::RawTable;
use tempfile::{TempDir, tempdir};

/// Builds a raw table from string literals.
pub fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

/// Scratch project root with `data_raw/` populated by the test.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("temp dir");
        fs::create_dir_all(temp_dir.path().join("data_raw")).expect("create data_raw");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::from_root(self.path())
    }

    /// Writes `contents` to `data_raw/<name>` and returns the path.
    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join("data_raw").join(name);
        fs::write(&path, contents).expect("write raw csv");
        path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join("data_prepared").join(relative))
            .expect("read output file")
    }

    pub fn output_exists(&self, relative: &str) -> bool {
        self.path().join("data_prepared").join(relative).exists()
    }

    /// A small two-season league in the default export layout.
    pub fn write_league(&self) {
        self.write_raw(
            "euroleague_header.csv",
            "game_id,date,time,team_a,team_b,score_a,score_b,season_code\n\
             G0,2022-05-01,18:00,Old A,Old B,70,71,2022\n\
             G1,2023-10-05,20:00,Real Madrid,Olympiacos,88,80,2023\n\
             G2,2023-10-06,19:30,Fenerbahce,Monaco,75,79,2023\n",
        );
        self.write_raw(
            "euroleague_teams.csv",
            "team_id,team_name,season_code\n\
             RMB,Real Madrid,2023\n\
             RMB,Real Madrid,2022\n\
             OLY,Olympiacos,2023\n\
             ULK,Fenerbahce,2023\n",
        );
        self.write_raw(
            "euroleague_players.csv",
            "player_id,player_name,team_id\n\
             P1,Campazzo,RMB\n\
             P1,Campazzo,RMB\n\
             P2,Vezenkov,OLY\n\
             P3,Wilbekin,ULK\n",
        );
        self.write_raw(
            "euroleague_box_score.csv",
            "game_id,player_id,team_id,points,assists,total_rebounds\n\
             G1,P1,RMB,12,7,3\n\
             G1,P2,OLY,25,1,9\n\
             G2,P3,ULK,18,4,2\n\
             G9,P4,XXX,2,0,1\n",
        );
    }
}
