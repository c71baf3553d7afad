//! Case-insensitive matching of target codes to source codes through a
//! [`CodeMap`].
//!
//! Matching folds everything to lowercase, but the result only ever contains
//! codes spelled exactly as the caller supplied them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::codes::CodeMap;

/// Outcome of [`reconcile`]: every target code is either mapped to a source
/// code or listed as unmatched, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub mapping: BTreeMap<String, String>,
    pub unmatched: BTreeSet<String>,
}

impl Reconciliation {
    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.mapping.get(target).map(String::as_str)
    }

    pub fn is_unmatched(&self, target: &str) -> bool {
        self.unmatched.contains(target)
    }

    /// Number of target codes covered, matched or not.
    pub fn len(&self) -> usize {
        self.mapping.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty() && self.unmatched.is_empty()
    }
}

/// Lowercase code -> original spelling. When several spellings fold to the
/// same key, the greatest one in byte order wins.
fn case_fold_index<'a, I>(codes: I) -> HashMap<String, &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let ordered: BTreeSet<&str> = codes.into_iter().collect();
    ordered
        .into_iter()
        .map(|code| (code.to_lowercase(), code))
        .collect()
}

/// Maps each target code to a source code via `converter`, ignoring case.
///
/// A target code is unmatched when the converter has no entry for it, or when
/// the converted code is not among `sources`.
pub fn reconcile<'t, 's, T, S>(converter: &CodeMap, targets: T, sources: S) -> Reconciliation
where
    T: IntoIterator<Item = &'t str>,
    S: IntoIterator<Item = &'s str>,
{
    // Crosswalk keys that fold together resolve to the greatest spelling's
    // entry, since the map iterates in ascending key order.
    let folded_converter: HashMap<String, String> = converter
        .iter()
        .map(|(from, to)| (from.to_lowercase(), to.to_lowercase()))
        .collect();
    let folded_sources = case_fold_index(sources);

    // Targets are classified one spelling at a time so that codes differing
    // only in case each land in the result.
    let targets: BTreeSet<&str> = targets.into_iter().collect();
    let mut result = Reconciliation::default();
    for target in targets {
        let resolved = folded_converter
            .get(&target.to_lowercase())
            .and_then(|source| folded_sources.get(source));
        match resolved {
            Some(source) => {
                result
                    .mapping
                    .insert(target.to_string(), (*source).to_string());
            }
            None => {
                result.unmatched.insert(target.to_string());
            }
        }
    }

    debug!(
        "Reconciled {} target code(s): {} matched, {} unmatched",
        result.len(),
        result.mapping.len(),
        result.unmatched.len()
    );
    result
}
