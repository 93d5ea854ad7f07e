//! Aggregate and per-day CSV files.
//!
//! Every file is rendered and encoded before the first one is created, so a
//! run that fails while preparing output leaves the output directory
//! untouched.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    config::PipelineConfig,
    io_utils,
    join::RecordSet,
    partition::{assign_file_names, partition_by_date},
};

const OUTPUT_DELIMITER: u8 = b',';

#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub rows: usize,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub flat: PlannedFile,
    pub by_day_dir: PathBuf,
    pub partitions: Vec<PlannedFile>,
}

fn render(
    path: PathBuf,
    headers: &[String],
    rows: Vec<Vec<String>>,
    config: &PipelineConfig,
) -> Result<PlannedFile> {
    let row_count = rows.len();
    let text = io_utils::render_csv(headers, rows, OUTPUT_DELIMITER)
        .with_context(|| format!("Rendering {path:?}"))?;
    let bytes = io_utils::encode_text(&text, config.output_encoding)
        .with_context(|| format!("Encoding {path:?}"))?;
    Ok(PlannedFile {
        path,
        rows: row_count,
        bytes,
    })
}

pub fn plan_outputs(config: &PipelineConfig, records: &RecordSet) -> Result<OutputPlan> {
    let headers = records.headers();
    let flat = render(config.flat_path(), &headers, records.rows().collect(), config)?;

    let by_day_dir = config.by_day_dir();
    let mut partitions = Vec::new();
    if config.write_partitions {
        let groups = partition_by_date(records);
        info!("Unique game dates: {}", groups.len());
        for (name, partition) in assign_file_names(&config.partition_prefix, &groups)? {
            let rows = partition
                .records
                .iter()
                .map(|record| record.to_row(&records.schema.fields))
                .collect();
            partitions.push(render(by_day_dir.join(name), &headers, rows, config)?);
        }
    }

    Ok(OutputPlan {
        flat,
        by_day_dir,
        partitions,
    })
}

pub fn commit(plan: &OutputPlan, config: &PipelineConfig) -> Result<()> {
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Creating output directory {:?}", config.output_dir))?;
    fs::write(&plan.flat.path, &plan.flat.bytes)
        .with_context(|| format!("Writing flat file {:?}", plan.flat.path))?;
    info!(
        "Saved flat file: {:?} ({} row(s))",
        plan.flat.path, plan.flat.rows
    );

    if !config.write_partitions {
        return Ok(());
    }
    fs::create_dir_all(&plan.by_day_dir)
        .with_context(|| format!("Creating by-day directory {:?}", plan.by_day_dir))?;
    for file in &plan.partitions {
        fs::write(&file.path, &file.bytes)
            .with_context(|| format!("Writing partition file {:?}", file.path))?;
        debug!("Wrote {} row(s) to {:?}", file.rows, file.path);
    }
    info!(
        "Saved {} per-day file(s) into: {:?}",
        plan.partitions.len(),
        plan.by_day_dir
    );
    Ok(())
}
