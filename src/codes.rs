use std::{collections::BTreeMap, path::Path};

use log::debug;

use crate::{
    config::CodeTableConfig,
    error::{AtlasError, Result},
    store::Table,
};

/// Mapping from a code in the new vocabulary to the matching code in the old
/// one, exactly as spelled in the crosswalk table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMap {
    entries: BTreeMap<String, String>,
}

impl CodeMap {
    /// Loads the crosswalk described by `config`. Every row contributes one
    /// entry; a repeated key keeps the later row.
    pub fn build(config: &CodeTableConfig) -> Result<Self> {
        let table = Table::load_with(&config.source, &config.key_column, &config.format()?)?;
        let map = Self::from_table(&table, &config.value_column, &config.source)?;
        debug!(
            "Built code map '{}' -> '{}' with {} entr(ies)",
            config.key_column,
            config.value_column,
            map.len()
        );
        Ok(map)
    }

    fn from_table(table: &Table, value_column: &str, source: &Path) -> Result<Self> {
        if !table.has_column(value_column) {
            return Err(AtlasError::MissingColumn {
                path: source.to_path_buf(),
                column: value_column.to_string(),
            });
        }
        Ok(table
            .iter()
            .map(|(key, row)| {
                let value = row.get(value_column).unwrap_or_default();
                (key.to_string(), value.to_string())
            })
            .collect())
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CodeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
