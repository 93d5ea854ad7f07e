//! End-to-end run: load, resolve, normalize, filter, join, partition, write.
//!
//! Every step runs once and in order. The first fatal error aborts the run
//! before any output file is created.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    config::PipelineConfig,
    fields::{Field, FieldCatalog, TableKind},
    frame::RawTable,
    join::{OutputSchema, RecordSet, join_all},
    normalize::normalize,
    output,
    resolve::{ColumnMap, resolve_table},
    season::{SeasonOrdering, filter_latest_season},
};

/// The four provider exports, fully materialized.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub header: RawTable,
    pub teams: RawTable,
    pub players: RawTable,
    pub box_score: RawTable,
}

impl RawTables {
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        info!("Reading CSV files from: {:?}", config.raw_dir);
        let read = |table: TableKind| -> Result<RawTable> {
            let path = config.input_path(table);
            let raw = RawTable::read(&path, config.input_delimiter(table), config.input_encoding)
                .with_context(|| format!("Loading {table} table from {path:?}"))?;
            let (rows, columns) = raw.shape();
            info!(" {table}: ({rows}, {columns})");
            Ok(raw)
        };
        Ok(Self {
            header: read(TableKind::Header)?,
            teams: read(TableKind::Teams)?,
            players: read(TableKind::Players)?,
            box_score: read(TableKind::BoxScore)?,
        })
    }

    pub fn table(&self, kind: TableKind) -> &RawTable {
        match kind {
            TableKind::Header => &self.header,
            TableKind::Teams => &self.teams,
            TableKind::Players => &self.players,
            TableKind::BoxScore => &self.box_score,
        }
    }
}

/// Column maps for all four tables plus the output columns they imply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub header: ColumnMap,
    pub teams: ColumnMap,
    pub players: ColumnMap,
    pub box_score: ColumnMap,
    pub output: OutputSchema,
}

impl ResolvedSchema {
    pub fn map(&self, kind: TableKind) -> &ColumnMap {
        match kind {
            TableKind::Header => &self.header,
            TableKind::Teams => &self.teams,
            TableKind::Players => &self.players,
            TableKind::BoxScore => &self.box_score,
        }
    }
}

pub fn resolve_schema(tables: &RawTables, catalog: &FieldCatalog) -> Result<ResolvedSchema> {
    let resolve = |kind: TableKind| -> Result<ColumnMap> {
        Ok(resolve_table(
            kind,
            &tables.table(kind).headers,
            catalog.table(kind),
        )?)
    };
    let header = resolve(TableKind::Header)?;
    let teams = resolve(TableKind::Teams)?;
    let players = resolve(TableKind::Players)?;
    let box_score = resolve(TableKind::BoxScore)?;
    let output = OutputSchema::from_maps(&header, &teams, &box_score);
    Ok(ResolvedSchema {
        header,
        teams,
        players,
        box_score,
        output,
    })
}

#[derive(Debug, Clone)]
pub struct Flattened {
    pub schema: ResolvedSchema,
    pub season: Option<String>,
    pub season_ordering: SeasonOrdering,
    pub records: RecordSet,
}

/// Consumes the raw tables and produces the flat record set.
pub fn flatten(tables: RawTables, catalog: &FieldCatalog) -> Result<Flattened> {
    let schema = resolve_schema(&tables, catalog)?;
    if !schema.teams.is_resolved(Field::TeamName) {
        warn!("No team_name column in teams table, skipping team-name merge from this file");
    }

    let header = normalize(&tables.header, &schema.header, TableKind::Header.deduplicates())?;
    let teams = normalize(&tables.teams, &schema.teams, TableKind::Teams.deduplicates())?;
    let players = normalize(&tables.players, &schema.players, TableKind::Players.deduplicates())?;
    let box_score = normalize(
        &tables.box_score,
        &schema.box_score,
        TableKind::BoxScore.deduplicates(),
    )?;
    drop(tables);

    let selection = filter_latest_season(header)?;
    let records = join_all(
        schema.output.clone(),
        &box_score,
        &selection.header,
        &teams,
        &players,
    );

    Ok(Flattened {
        schema,
        season: selection.season,
        season_ordering: selection.ordering,
        records,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub season: Option<String>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub flat_path: PathBuf,
    pub partition_files: Vec<PathBuf>,
}

pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let tables = RawTables::load(config)?;
    let flattened = flatten(tables, &config.catalog)?;
    let plan = output::plan_outputs(config, &flattened.records)?;
    output::commit(&plan, config)?;
    info!("Done.");
    Ok(RunSummary {
        season: flattened.season,
        rows: flattened.records.len(),
        columns: flattened.records.headers(),
        flat_path: plan.flat.path.clone(),
        partition_files: plan.partitions.iter().map(|f| f.path.clone()).collect(),
    })
}
