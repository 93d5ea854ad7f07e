//! Directory layout and I/O settings for one pipeline run.

use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::Encoding;

use crate::{
    fields::{FieldCatalog, TableKind},
    io_utils,
    partition::DEFAULT_PARTITION_PREFIX,
};

pub const RAW_DIR_NAME: &str = "data_raw";
pub const OUTPUT_DIR_NAME: &str = "data_prepared";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub header: String,
    pub teams: String,
    pub players: String,
    pub box_score: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            header: "euroleague_header.csv".to_string(),
            teams: "euroleague_teams.csv".to_string(),
            players: "euroleague_players.csv".to_string(),
            box_score: "euroleague_box_score.csv".to_string(),
        }
    }
}

impl InputFiles {
    pub fn file_name(&self, table: TableKind) -> &str {
        match table {
            TableKind::Header => &self.header,
            TableKind::Teams => &self.teams,
            TableKind::Players => &self.players,
            TableKind::BoxScore => &self.box_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    pub inputs: InputFiles,
    pub flat_file_name: String,
    pub by_day_dir_name: String,
    pub partition_prefix: String,
    /// Write per-day files in addition to the aggregate file.
    pub write_partitions: bool,
    /// Input delimiter; `None` picks one from each file's extension.
    pub delimiter: Option<u8>,
    pub input_encoding: &'static Encoding,
    pub output_encoding: &'static Encoding,
    pub catalog: FieldCatalog,
}

impl PipelineConfig {
    pub fn new(raw_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output_dir: output_dir.into(),
            inputs: InputFiles::default(),
            flat_file_name: "euroleague_flat.csv".to_string(),
            by_day_dir_name: "by_day".to_string(),
            partition_prefix: DEFAULT_PARTITION_PREFIX.to_string(),
            write_partitions: true,
            delimiter: None,
            input_encoding: encoding_rs::UTF_8,
            output_encoding: encoding_rs::UTF_8,
            catalog: FieldCatalog::default(),
        }
    }

    /// `<root>/data_raw` in, `<root>/data_prepared` out.
    pub fn from_root(root: &Path) -> Self {
        Self::new(root.join(RAW_DIR_NAME), root.join(OUTPUT_DIR_NAME))
    }

    pub fn with_encodings(mut self, input: Option<&str>, output: Option<&str>) -> Result<Self> {
        self.input_encoding = io_utils::resolve_encoding(input)?;
        self.output_encoding = io_utils::resolve_encoding(output)?;
        Ok(self)
    }

    pub fn input_path(&self, table: TableKind) -> PathBuf {
        self.raw_dir.join(self.inputs.file_name(table))
    }

    pub fn input_delimiter(&self, table: TableKind) -> u8 {
        io_utils::resolve_input_delimiter(&self.input_path(table), self.delimiter)
    }

    pub fn flat_path(&self) -> PathBuf {
        self.output_dir.join(&self.flat_file_name)
    }

    pub fn by_day_dir(&self) -> PathBuf {
        self.output_dir.join(&self.by_day_dir_name)
    }
}
