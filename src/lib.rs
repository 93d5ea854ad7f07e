pub mod cli;
pub mod config;
pub mod error;
pub mod fields;
pub mod frame;
pub mod io_utils;
pub mod join;
pub mod normalize;
pub mod output;
pub mod partition;
pub mod pipeline;
pub mod resolve;
pub mod season;
pub mod table;
pub mod yaml_provider;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};
use serde::Serialize;

use crate::{
    cli::{Cli, Commands, FieldsArgs, FlattenArgs, InputArgs, ResolveArgs},
    config::PipelineConfig,
    fields::{FieldCatalog, TableKind},
    join::OutputSchema,
    pipeline::RawTables,
    resolve::ColumnMap,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("league_flat", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Flatten(args) => handle_flatten(&args),
        Commands::Resolve(args) => handle_resolve(&args),
        Commands::Fields(args) => handle_fields(&args),
    }
}

fn build_config(input: &InputArgs, output_dir: Option<&Path>) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_root(&input.root);
    if let Some(raw_dir) = &input.raw_dir {
        config.raw_dir = raw_dir.clone();
    }
    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir.to_path_buf();
    }
    if let Some(path) = &input.fields {
        config.catalog = FieldCatalog::load(path)
            .with_context(|| format!("Loading field catalog from {path:?}"))?;
        debug!("Using field catalog from {path:?}");
    }
    config.delimiter = input.delimiter;
    config.with_encodings(input.input_encoding.as_deref(), None)
}

fn handle_flatten(args: &FlattenArgs) -> Result<()> {
    let mut config = build_config(&args.input, args.output_dir.as_deref())?;
    config.output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    config.write_partitions = !args.no_partitions;
    info!("Flattening {:?} -> {:?}", config.raw_dir, config.output_dir);
    let summary = pipeline::run(&config)?;
    info!(
        "{} row(s) x {} column(s) for season {}",
        summary.rows,
        summary.columns.len(),
        summary.season.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

#[derive(Serialize)]
struct ResolutionReport<'a> {
    tables: Vec<&'a ColumnMap>,
    output: &'a OutputSchema,
}

fn handle_resolve(args: &ResolveArgs) -> Result<()> {
    let config = build_config(&args.input, None)?;
    let tables = RawTables::load(&config)?;
    let schema = pipeline::resolve_schema(&tables, &config.catalog)?;

    if args.json {
        let report = ResolutionReport {
            tables: TableKind::ALL.iter().map(|kind| schema.map(*kind)).collect(),
            output: &schema.output,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Serializing resolution report")?
        );
        return Ok(());
    }

    let headers = ["table", "field", "required", "source"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = TableKind::ALL
        .iter()
        .flat_map(|kind| schema.map(*kind).report_rows())
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    println!();
    println!("output columns: {}", schema.output.headers().join(", "));
    Ok(())
}

fn handle_fields(args: &FieldsArgs) -> Result<()> {
    let catalog = FieldCatalog::default();
    match &args.output {
        Some(path) => {
            catalog.save(path)?;
            info!("Field catalog written to {path:?}");
        }
        None => print!("{}", catalog.to_yaml_string()?),
    }
    Ok(())
}
