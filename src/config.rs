//! YAML configuration for the crosswalk table, the GDP table and the target
//! catalog.
//!
//! Field names accept the legacy spellings (`codefile`, `plot_codes`,
//! `data_codes`, `separator`, `gdpfile`, `country_code`, `country_name`) so
//! existing course-style configs load unchanged.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AtlasError, Result},
    gdp::TargetCatalog,
    io_utils,
    store::{Table, TableFormat},
};

fn default_delimiter() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

fn table_format(delimiter: char, quote: char, encoding: Option<&String>) -> Result<TableFormat> {
    Ok(TableFormat {
        delimiter: io_utils::ascii_byte(delimiter, "delimiter")?,
        quote: io_utils::ascii_byte(quote, "quote")?,
        encoding: encoding.cloned(),
    })
}

/// Crosswalk between the plotting library's codes and the GDP source's codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeTableConfig {
    #[serde(alias = "codefile")]
    pub source: PathBuf,
    /// Column holding the new (plotting library) vocabulary; becomes the key.
    #[serde(alias = "plot_codes")]
    pub key_column: String,
    /// Column holding the old (GDP source) vocabulary; becomes the value.
    #[serde(alias = "data_codes")]
    pub value_column: String,
    #[serde(default = "default_delimiter", alias = "separator")]
    pub delimiter: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl CodeTableConfig {
    pub fn format(&self) -> Result<TableFormat> {
        table_format(self.delimiter, self.quote, self.encoding.as_ref())
    }
}

/// GDP-by-year table: one row per country, one column per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GdpTableConfig {
    #[serde(alias = "gdpfile")]
    pub source: PathBuf,
    #[serde(alias = "country_code")]
    pub key_column: String,
    #[serde(default, alias = "country_name", skip_serializing_if = "Option::is_none")]
    pub name_column: Option<String>,
    #[serde(default = "default_delimiter", alias = "separator")]
    pub delimiter: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

impl GdpTableConfig {
    pub fn format(&self) -> Result<TableFormat> {
        table_format(self.delimiter, self.quote, self.encoding.as_ref())
    }

    /// Rejects years outside `min_year..=max_year` when either bound is set.
    pub fn check_year(&self, year: &str) -> Result<()> {
        if self.min_year.is_none() && self.max_year.is_none() {
            return Ok(());
        }
        let min = self.min_year.unwrap_or(i32::MIN);
        let max = self.max_year.unwrap_or(i32::MAX);
        match year.trim().parse::<i32>() {
            Ok(value) if (min..=max).contains(&value) => Ok(()),
            _ => Err(AtlasError::YearOutOfRange {
                year: year.to_string(),
                min,
                max,
            }),
        }
    }
}

/// The plotting library's country catalog, stored as a code/name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    pub source: PathBuf,
    pub code_column: String,
    pub name_column: String,
    #[serde(default = "default_delimiter", alias = "separator")]
    pub delimiter: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl CatalogConfig {
    pub fn format(&self) -> Result<TableFormat> {
        table_format(self.delimiter, self.quote, self.encoding.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtlasConfig {
    #[serde(alias = "codeinfo")]
    pub codes: CodeTableConfig,
    #[serde(alias = "gdpinfo")]
    pub gdp: GdpTableConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogConfig>,
}

impl AtlasConfig {
    /// Reads a YAML config; relative table paths resolve against the
    /// config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| AtlasError::ResourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_yaml::from_str(&raw)
            .map_err(|err| AtlasError::InvalidConfig(format!("{}: {err}", path.display())))?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        debug!("Loaded configuration from {path:?}");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|err| AtlasError::InvalidConfig(err.to_string()))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        rebase(&mut self.codes.source, base);
        rebase(&mut self.gdp.source, base);
        if let Some(catalog) = self.catalog.as_mut() {
            rebase(&mut catalog.source, base);
        }
    }
}

fn rebase(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

/// Reads the target catalog (code -> display name) described by `config`.
pub fn load_catalog(config: &CatalogConfig) -> Result<TargetCatalog> {
    let table = Table::load_with(&config.source, &config.code_column, &config.format()?)?;
    if !table.has_column(&config.name_column) {
        return Err(AtlasError::MissingColumn {
            path: config.source.clone(),
            column: config.name_column.clone(),
        });
    }
    Ok(table
        .iter()
        .map(|(code, row)| {
            let name = row.get(&config.name_column).unwrap_or_default();
            (code.to_string(), name.to_string())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"
codeinfo:
  codefile: isp_country_codes.csv
  separator: ","
  quote: '"'
  plot_codes: ISO3166-1-Alpha-2
  data_codes: ISO3166-1-Alpha-3
gdpinfo:
  gdpfile: isp_gdp.csv
  separator: ","
  quote: '"'
  min_year: 1960
  max_year: 2015
  country_name: Country Name
  country_code: Country Code
"#;

    #[test]
    fn legacy_field_names_are_accepted() {
        let config = AtlasConfig::from_yaml_str(LEGACY).expect("parse legacy config");
        assert_eq!(config.codes.key_column, "ISO3166-1-Alpha-2");
        assert_eq!(config.codes.value_column, "ISO3166-1-Alpha-3");
        assert_eq!(config.gdp.key_column, "Country Code");
        assert_eq!(config.gdp.name_column.as_deref(), Some("Country Name"));
        assert_eq!(config.gdp.min_year, Some(1960));
        assert!(config.catalog.is_none());
    }

    #[test]
    fn delimiter_and_quote_default() {
        let raw = "codes: {source: c.csv, key_column: a, value_column: b}\n\
                   gdp: {source: g.csv, key_column: code}\n";
        let config = AtlasConfig::from_yaml_str(raw).expect("parse config");
        let format = config.codes.format().expect("format");
        assert_eq!(format.delimiter, b',');
        assert_eq!(format.quote, b'"');
        assert_eq!(format.encoding, None);
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let raw = "codes: {source: c.csv, key_column: a, value_column: b, delimiter: '§'}\n\
                   gdp: {source: g.csv, key_column: code}\n";
        let config = AtlasConfig::from_yaml_str(raw).expect("parse config");
        assert!(matches!(
            config.codes.format(),
            Err(AtlasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn check_year_honours_bounds() {
        let config = AtlasConfig::from_yaml_str(LEGACY).expect("parse legacy config");
        assert!(config.gdp.check_year("1960").is_ok());
        assert!(config.gdp.check_year("2015").is_ok());
        assert!(matches!(
            config.gdp.check_year("1959"),
            Err(AtlasError::YearOutOfRange { min: 1960, max: 2015, .. })
        ));
        assert!(config.gdp.check_year("nineteen").is_err());
    }

    #[test]
    fn check_year_is_open_without_bounds() {
        let raw = "codes: {source: c.csv, key_column: a, value_column: b}\n\
                   gdp: {source: g.csv, key_column: code}\n";
        let config = AtlasConfig::from_yaml_str(raw).expect("parse config");
        assert!(config.gdp.check_year("anything").is_ok());
    }

    #[test]
    fn relative_sources_resolve_against_config_dir() {
        let mut config = AtlasConfig::from_yaml_str(LEGACY).expect("parse legacy config");
        config.resolve_relative_to(Path::new("/data/atlas"));
        assert_eq!(
            config.codes.source,
            PathBuf::from("/data/atlas/isp_country_codes.csv")
        );
        assert_eq!(config.gdp.source, PathBuf::from("/data/atlas/isp_gdp.csv"));
    }
}
