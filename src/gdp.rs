//! Joins GDP-by-year figures onto the plotting library's country codes.
//!
//! The join never drops a target code. Each code from the catalog ends up in
//! exactly one of [`GdpResult::values`], [`GdpResult::no_code_match`] or
//! [`GdpResult::no_year_data`].

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use crate::{
    codes::CodeMap,
    config::{AtlasConfig, GdpTableConfig},
    error::{AtlasError, Result},
    reconcile::reconcile,
    store::Table,
};

/// Plotting-library code -> display name, supplied by the caller.
pub type TargetCatalog = BTreeMap<String, String>;

/// Where a single target code landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// log10 of the GDP figure.
    Value(f64),
    NoCodeMatch,
    NoYearData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdpResult {
    /// Target code -> log10(GDP).
    pub values: BTreeMap<String, f64>,
    /// Target codes with no counterpart in the GDP table.
    pub no_code_match: BTreeSet<String>,
    /// Target codes found in the GDP table with no figure for the year.
    pub no_year_data: BTreeSet<String>,
}

impl GdpResult {
    pub fn outcome(&self, code: &str) -> Option<Outcome> {
        if let Some(value) = self.values.get(code) {
            Some(Outcome::Value(*value))
        } else if self.no_code_match.contains(code) {
            Some(Outcome::NoCodeMatch)
        } else if self.no_year_data.contains(code) {
            Some(Outcome::NoYearData)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.no_code_match.len() + self.no_year_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads the GDP table described by `config` and joins it for `year`.
pub fn join(
    config: &GdpTableConfig,
    converter: &CodeMap,
    targets: &TargetCatalog,
    year: &str,
) -> Result<GdpResult> {
    config.check_year(year)?;
    let table = Table::load_with(&config.source, &config.key_column, &config.format()?)?;
    join_table(&table, converter, targets, year)
}

/// Joins an already loaded GDP table for `year`.
///
/// A missing or blank year field is a data outcome. A figure that is not a
/// finite, strictly positive number fails the join with
/// [`AtlasError::InvalidNumericData`].
pub fn join_table(
    table: &Table,
    converter: &CodeMap,
    targets: &TargetCatalog,
    year: &str,
) -> Result<GdpResult> {
    let reconciliation = reconcile(
        converter,
        targets.keys().map(String::as_str),
        table.keys(),
    );

    let mut result = GdpResult {
        no_code_match: reconciliation.unmatched,
        ..GdpResult::default()
    };
    for (target, gdp_code) in reconciliation.mapping {
        let raw = table
            .get(&gdp_code)
            .and_then(|row| row.get(year))
            .map(str::trim)
            .unwrap_or_default();
        if raw.is_empty() {
            debug!("No {year} figure for {target} ({gdp_code})");
            result.no_year_data.insert(target);
            continue;
        }
        let value = parse_gdp(raw).ok_or_else(|| AtlasError::InvalidNumericData {
            code: gdp_code.clone(),
            year: year.to_string(),
            value: raw.to_string(),
        })?;
        result.values.insert(target, value.log10());
    }

    info!(
        "GDP join for {}: {} value(s), {} without code match, {} without data for the year",
        year,
        result.values.len(),
        result.no_code_match.len(),
        result.no_year_data.len()
    );
    Ok(result)
}

/// Builds the code map from `config` and joins the GDP table for `year`.
pub fn build_map(config: &AtlasConfig, targets: &TargetCatalog, year: &str) -> Result<GdpResult> {
    // Fail on a bad year before the crosswalk is read.
    config.gdp.check_year(year)?;
    let converter = CodeMap::build(&config.codes)?;
    join(&config.gdp, &converter, targets, year)
}

fn parse_gdp(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}
