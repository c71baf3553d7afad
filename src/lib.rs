pub mod cli;
pub mod codes;
pub mod config;
pub mod error;
pub mod gdp;
pub mod io_utils;
pub mod reconcile;
pub mod render;
pub mod store;

use std::{env, fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, OutputFormat},
    codes::CodeMap,
    config::AtlasConfig,
    gdp::TargetCatalog,
    render::{ChoroplethMap, CsvRenderer, JsonRenderer, Renderer},
    store::Table,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("gdp_atlas", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Map(args) => handle_map(&args),
        Commands::Reconcile(args) => handle_reconcile(&args),
    }
}

fn load_inputs(path: &Path) -> Result<(AtlasConfig, TargetCatalog)> {
    let config =
        AtlasConfig::load(path).with_context(|| format!("Loading configuration from {path:?}"))?;
    let catalog_config = config
        .catalog
        .as_ref()
        .ok_or_else(|| anyhow!("Configuration {path:?} has no 'catalog' section"))?;
    let catalog = crate::config::load_catalog(catalog_config)
        .with_context(|| format!("Loading target catalog from {:?}", catalog_config.source))?;
    debug!("Target catalog holds {} code(s)", catalog.len());
    Ok((config, catalog))
}

fn handle_map(args: &cli::MapArgs) -> Result<()> {
    let (config, catalog) = load_inputs(&args.config)?;
    let renderer: Box<dyn Renderer> = match args.format {
        OutputFormat::Csv => Box::new(CsvRenderer {
            delimiter: args.delimiter,
        }),
        OutputFormat::Json => Box::new(JsonRenderer),
    };
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Creating output directory {:?}", args.output_dir))?;

    for year in &args.years {
        info!(
            "Mapping GDP for {} using '{}' with delimiter '{}'",
            year,
            config.gdp.source.display(),
            config.gdp.delimiter
        );
        let result = gdp::build_map(&config, &catalog, year)
            .with_context(|| format!("Building GDP map for {year}"))?;
        let output = args.output_dir.join(format!(
            "{}_{}.{}",
            args.prefix,
            year,
            renderer.extension()
        ));
        let map = ChoroplethMap::new(&result, &catalog, year);
        renderer
            .render(&map, &output)
            .with_context(|| format!("Writing map data to {output:?}"))?;
        info!(
            "{} map for {} written to {:?}",
            render::TITLE,
            year,
            output
        );
        debug!("\n{}", render::summary_table(&map));
    }
    Ok(())
}

fn handle_reconcile(args: &cli::ReconcileArgs) -> Result<()> {
    let (config, catalog) = load_inputs(&args.config)?;
    let converter = CodeMap::build(&config.codes)
        .with_context(|| format!("Building code map from {:?}", config.codes.source))?;
    let gdp_format = config.gdp.format()?;
    let gdp_table = Table::load_with(&config.gdp.source, &config.gdp.key_column, &gdp_format)
        .with_context(|| format!("Loading GDP table from {:?}", config.gdp.source))?;

    let reconciliation = reconcile::reconcile(
        &converter,
        catalog.keys().map(String::as_str),
        gdp_table.keys(),
    );
    let gdp_name_column = config.gdp.name_column.as_deref();
    let mut headers = vec!["code".to_string(), "name".to_string(), "gdp_code".to_string()];
    if let Some(column) = gdp_name_column {
        headers.push(column.to_string());
    }
    let rows = catalog
        .iter()
        .map(|(code, name)| {
            let gdp_code = reconciliation.source_for(code);
            let mut row = vec![
                code.clone(),
                name.clone(),
                gdp_code.unwrap_or_default().to_string(),
            ];
            if let Some(column) = gdp_name_column {
                let gdp_name = gdp_code
                    .and_then(|gdp_code| gdp_table.get(gdp_code))
                    .and_then(|gdp_row| gdp_row.get(column))
                    .unwrap_or_default();
                row.push(gdp_name.to_string());
            }
            row
        })
        .collect::<Vec<_>>();
    print!("{}", render::render_table(&headers, &rows));
    info!(
        "{} code(s) matched, {} unmatched",
        reconciliation.mapping.len(),
        reconciliation.unmatched.len()
    );
    Ok(())
}
