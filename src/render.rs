//! Output side of the pipeline.
//!
//! A [`Renderer`] receives the three join collections for one year and writes
//! an artifact. Drawing an actual map is left to downstream tooling; the
//! renderers here emit the same three series a choropleth would plot.

use std::{borrow::Cow, fmt::Write as _, io::Write, path::Path};

use serde::Serialize;

use crate::{
    error::{AtlasError, Result},
    gdp::{GdpResult, Outcome, TargetCatalog},
    io_utils,
};

pub const TITLE: &str = "GDP data per country at given year (log scale)";
pub const NO_DATA_LABEL: &str = "No data";
pub const NO_YEAR_DATA_LABEL: &str = "No gdp data for given year";

/// Everything a renderer needs for one year.
#[derive(Debug, Clone, Copy)]
pub struct ChoroplethMap<'a> {
    pub result: &'a GdpResult,
    pub catalog: &'a TargetCatalog,
    pub year: &'a str,
}

impl<'a> ChoroplethMap<'a> {
    pub fn new(result: &'a GdpResult, catalog: &'a TargetCatalog, year: &'a str) -> Self {
        Self {
            result,
            catalog,
            year,
        }
    }

    pub fn series_label(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Value(_) => format!("In {}", self.year),
            Outcome::NoCodeMatch => NO_DATA_LABEL.to_string(),
            Outcome::NoYearData => NO_YEAR_DATA_LABEL.to_string(),
        }
    }

    /// `(code, display name, outcome)` for every catalog code, by code.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a str, Outcome)> + 'a {
        let result = self.result;
        let catalog = self.catalog;
        catalog.iter().filter_map(move |(code, name)| {
            result
                .outcome(code)
                .map(|outcome| (code.as_str(), name.as_str(), outcome))
        })
    }
}

pub trait Renderer {
    /// File extension of the artifact, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, map: &ChoroplethMap<'_>, output: &Path) -> Result<()>;
}

/// One row per catalog code: `code,name,series,log10_gdp`.
#[derive(Debug, Clone, Default)]
pub struct CsvRenderer {
    pub delimiter: Option<u8>,
}

impl Renderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        match self.delimiter {
            Some(b'\t') => "tsv",
            _ => "csv",
        }
    }

    fn render(&self, map: &ChoroplethMap<'_>, output: &Path) -> Result<()> {
        let delimiter = io_utils::resolve_output_delimiter(output, self.delimiter);
        let mut writer = io_utils::open_csv_writer(output, delimiter)?;
        let csv_err = |source| AtlasError::Csv {
            path: output.to_path_buf(),
            source,
        };
        writer
            .write_record(["code", "name", "series", "log10_gdp"])
            .map_err(csv_err)?;
        for (code, name, outcome) in map.entries() {
            let value = match outcome {
                Outcome::Value(value) => value.to_string(),
                _ => String::new(),
            };
            writer
                .write_record([code, name, map.series_label(outcome).as_str(), value.as_str()])
                .map_err(csv_err)?;
        }
        writer.flush().map_err(|source| AtlasError::Io {
            path: output.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Serialize)]
struct JsonMap<'a> {
    title: &'static str,
    year: &'a str,
    values: &'a std::collections::BTreeMap<String, f64>,
    no_data: &'a std::collections::BTreeSet<String>,
    no_year_data: &'a std::collections::BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, map: &ChoroplethMap<'_>, output: &Path) -> Result<()> {
        let io_err = |source: std::io::Error| AtlasError::Io {
            path: output.to_path_buf(),
            source,
        };
        let document = JsonMap {
            title: TITLE,
            year: map.year,
            values: &map.result.values,
            no_data: &map.result.no_code_match,
            no_year_data: &map.result.no_year_data,
        };
        let mut writer = io_utils::open_output(output)?;
        serde_json::to_writer_pretty(&mut writer, &document)
            .map_err(|err| io_err(err.into()))?;
        writeln!(writer).map_err(io_err)?;
        writer.flush().map_err(io_err)
    }
}

/// Plain-text table with the size of each series, for terminal output.
pub fn summary_table(map: &ChoroplethMap<'_>) -> String {
    let headers = vec!["series".to_string(), "countries".to_string()];
    let rows = vec![
        vec![
            map.series_label(Outcome::Value(0.0)),
            map.result.values.len().to_string(),
        ],
        vec![
            NO_DATA_LABEL.to_string(),
            map.result.no_code_match.len().to_string(),
        ],
        vec![
            NO_YEAR_DATA_LABEL.to_string(),
            map.result.no_year_data.len().to_string(),
        ],
    ];
    render_table(&headers, &rows)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
