/// Upstream wire records.
///
/// Each record is a flat JSON object of strings. Lists are encoded as a single
/// `~`-separated string, and parallel lists (`sub_keys`, `sub_names`,
/// `sub_zips`, ...) share indices. Unknown attributes are ignored and missing
/// ones decode as empty strings.
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::GenerateError;
use crate::normalize::split_multi;

/// Decodes the record fetched from `path`.
///
/// # Errors
///
/// Returns [`GenerateError::Decode`] when `body` is not the expected shape.
pub fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, GenerateError> {
    serde_json::from_str(body).map_err(|e| GenerateError::Decode {
        path: path.to_owned(),
        detail: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CountryList
// ---------------------------------------------------------------------------

/// The `data` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CountryList {
    pub countries: String,
}

impl CountryList {
    /// Country codes in upstream order.
    pub fn codes(&self) -> Vec<String> {
        split_multi(&self.countries)
            .into_iter()
            .filter(|code| !code.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// CountryRecord
// ---------------------------------------------------------------------------

/// A `data/{CC}` or `data/{CC}--{lang}` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CountryRecord {
    pub id: String,
    pub key: String,
    pub lang: String,
    pub languages: String,
    pub name: String,
    pub fmt: String,
    pub lfmt: String,
    pub state_name_type: String,
    pub locality_name_type: String,
    pub sublocality_name_type: String,
    pub zip_name_type: String,
    pub require: String,
    pub upper: String,
    pub sub_isoids: String,
    pub sub_keys: String,
    pub sub_lnames: String,
    pub sub_names: String,
    pub sub_mores: String,
    pub sub_xrequires: String,
    pub sub_xzips: String,
    pub sub_zips: String,
    pub sub_zipexs: String,
    pub post_prefix: String,
    pub zip: String,
    pub zipex: String,
}

impl CountryRecord {
    /// The first-level subdivision columns of this record.
    pub fn subdivisions(&self) -> SubdivisionColumns<'_> {
        SubdivisionColumns {
            id: &self.id,
            keys: split_multi(&self.sub_keys),
            names: split_multi(&self.sub_names),
            latinized_names: split_multi(&self.sub_lnames),
            mores: split_multi(&self.sub_mores),
            zips: split_multi(&self.sub_zips),
            zip_examples: split_multi(&self.sub_zipexs),
            iso_ids: split_multi(&self.sub_isoids),
            excluded_requires: split_multi(&self.sub_xrequires),
            excluded_zips: split_multi(&self.sub_xzips),
        }
    }

    /// Languages the record is published in.
    pub fn language_list(&self) -> Vec<&str> {
        split_multi(&self.languages)
            .into_iter()
            .filter(|language| !language.is_empty())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SubdivisionRecord
// ---------------------------------------------------------------------------

/// A `data/{CC}/{key}[/{key}...]` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubdivisionRecord {
    pub id: String,
    pub key: String,
    pub name: String,
    pub lname: String,
    pub lang: String,
    pub isoid: String,
    pub sub_keys: String,
    pub sub_names: String,
    pub sub_mores: String,
    pub sub_lnames: String,
    pub sub_lfnames: String,
    pub zip: String,
    pub zipex: String,
    pub sub_zips: String,
    pub sub_zipexs: String,
}

impl SubdivisionRecord {
    /// The child subdivision columns of this record.
    pub fn subdivisions(&self) -> SubdivisionColumns<'_> {
        SubdivisionColumns {
            id: &self.id,
            keys: split_multi(&self.sub_keys),
            names: split_multi(&self.sub_names),
            latinized_names: split_multi(&self.sub_lnames),
            mores: split_multi(&self.sub_mores),
            zips: split_multi(&self.sub_zips),
            zip_examples: split_multi(&self.sub_zipexs),
            iso_ids: Vec::new(),
            excluded_requires: Vec::new(),
            excluded_zips: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// SubdivisionColumns
// ---------------------------------------------------------------------------

/// The parallel `sub_*` lists of one record, split but not yet interpreted.
///
/// An absent list is empty; a short list reads as empty strings past its end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdivisionColumns<'a> {
    /// Upstream id of the record the columns came from.
    pub id: &'a str,
    pub keys: Vec<&'a str>,
    pub names: Vec<&'a str>,
    pub latinized_names: Vec<&'a str>,
    pub mores: Vec<&'a str>,
    pub zips: Vec<&'a str>,
    pub zip_examples: Vec<&'a str>,
    pub iso_ids: Vec<&'a str>,
    pub excluded_requires: Vec<&'a str>,
    pub excluded_zips: Vec<&'a str>,
}

fn column<'a>(values: &[&'a str], index: usize) -> &'a str {
    values.get(index).copied().unwrap_or("")
}

/// One subdivision, read across the parallel columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubdivisionEntry<'a> {
    /// Stable id: the ISO code when the record publishes ISO codes, otherwise
    /// the upstream key. May be empty for unrecognised regions.
    pub id: &'a str,
    /// Upstream key; also the path segment of the child record.
    pub key: &'a str,
    /// Display name, falling back to the key.
    pub name: &'a str,
    /// Latinized display name, if the record publishes them.
    pub latinized_name: Option<&'a str>,
    /// Upstream has a child record for this entry.
    pub has_children: bool,
    /// Post-code prefix pattern, unanchored.
    pub zip: &'a str,
    /// Comma-separated sample post codes.
    pub zip_examples: &'a str,
    /// The entry is a territory with its own country record.
    pub excluded: bool,
}

impl<'a> SubdivisionColumns<'a> {
    /// Returns `true` when the record lists no subdivisions.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.iso_ids.is_empty()
    }

    /// Returns `true` when the record publishes latinized names.
    pub fn has_latinized_names(&self) -> bool {
        !self.latinized_names.is_empty()
    }

    /// The column entries are read from: ISO ids when published, else keys.
    fn ids(&self) -> &[&'a str] {
        if self.iso_ids.is_empty() {
            &self.keys
        } else {
            &self.iso_ids
        }
    }

    /// Number of entries, skipped ones included.
    pub fn len(&self) -> usize {
        self.ids().len()
    }

    /// Reads every entry across the columns, in upstream order.
    pub fn entries(&self) -> Vec<SubdivisionEntry<'a>> {
        self.ids()
            .iter()
            .copied()
            .enumerate()
            .map(|(i, id)| {
                let key = column(&self.keys, i);
                let name = column(&self.names, i);
                SubdivisionEntry {
                    id,
                    key,
                    name: if name.is_empty() { key } else { name },
                    latinized_name: self
                        .has_latinized_names()
                        .then(|| column(&self.latinized_names, i)),
                    has_children: column(&self.mores, i) == "true",
                    zip: column(&self.zips, i),
                    zip_examples: column(&self.zip_examples, i),
                    excluded: !column(&self.excluded_requires, i).is_empty()
                        || !column(&self.excluded_zips, i).is_empty(),
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
