use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Flatten league exports into one game/player table",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve, join, and write the flat file plus one file per game date
    Flatten(FlattenArgs),
    /// Show which source column each canonical field resolves to
    Resolve(ResolveArgs),
    /// Print or save the field catalog used for column resolution
    Fields(FieldsArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Project root holding data_raw/ and data_prepared/
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Directory with the four raw exports (defaults to <root>/data_raw)
    #[arg(long = "raw-dir")]
    pub raw_dir: Option<PathBuf>,
    /// YAML field catalog overriding the built-in candidate lists
    #[arg(long = "fields")]
    pub fields: Option<PathBuf>,
    /// CSV delimiter character for the inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct FlattenArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Destination directory (defaults to <root>/data_prepared)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Character encoding for the output files (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    /// Only write the aggregate flat file
    #[arg(long = "no-partitions")]
    pub no_partitions: bool,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Emit the resolution as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Write the catalog to this YAML file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
