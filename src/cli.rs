use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Join GDP data onto plotting-library country codes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join GDP figures for one or more years and write one map data file per year
    Map(MapArgs),
    /// Show how the catalog's country codes reconcile with the GDP table
    Reconcile(ReconcileArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// YAML configuration describing the code, GDP and catalog tables
    #[arg(short, long)]
    pub config: PathBuf,
    /// Year column to join (repeatable)
    #[arg(short, long = "year", required = true, action = clap::ArgAction::Append)]
    pub years: Vec<String>,
    /// Directory receiving the output files
    #[arg(short, long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// File name prefix; files are written as `<prefix>_<year>.<ext>`
    #[arg(long, default_value = "gdp_world_code")]
    pub prefix: String,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
    /// Output delimiter for CSV output (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// YAML configuration describing the code, GDP and catalog tables
    #[arg(short, long)]
    pub config: PathBuf,
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
