/// Per-country compilation.
///
/// [`compile_country`] turns the upstream record of one country, plus every
/// subdivision record it links to, into a [`CountryRule`]. The three
/// subdivision levels share one walker: each level yields its native nodes,
/// the latinized copy when upstream publishes latin names, and the post-code
/// rules keyed by subdivision ID. Any failed sanity check aborts the country.
use std::collections::BTreeMap;

use addrule_core::{AdministrativeArea, CountryRule, DependentLocality, Locality, PostCodeRule};

use crate::error::GenerateError;
use crate::normalize::{
    NAME_OVERRIDES, POST_CODE_PREFIX_OVERRIDES, allowed_fields, anchored, check_samples,
    default_language, field_name, letter_fields, lookup,
};
use crate::records::{CountryRecord, SubdivisionColumns, SubdivisionRecord, decode};
use crate::upstream::{Fetcher, child_path, country_path, language_path, strip_language};

/// Language of the tree built from latinized subdivision names.
pub const LATIN_LANGUAGE: &str = "en";

/// Deepest subdivision level: dependent localities.
const MAX_DEPTH: usize = 3;

// ---------------------------------------------------------------------------
// Subdivision walker
// ---------------------------------------------------------------------------

/// A subdivision before it is typed by level.
#[derive(Debug, Clone, Default)]
struct Node {
    id: String,
    name: String,
    postal_key: String,
    children: Vec<Node>,
}

impl Node {
    fn new(id: &str, name: &str, postal_key: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            postal_key: postal_key.to_owned(),
            children: Vec::new(),
        }
    }

    fn into_administrative_area(self) -> AdministrativeArea {
        AdministrativeArea {
            id: self.id,
            name: self.name,
            postal_key: self.postal_key,
            localities: self
                .children
                .into_iter()
                .map(Node::into_locality)
                .collect(),
        }
    }

    fn into_locality(self) -> Locality {
        Locality {
            id: self.id,
            name: self.name,
            dependent_localities: self
                .children
                .into_iter()
                .map(Node::into_dependent_locality)
                .collect(),
        }
    }

    fn into_dependent_locality(self) -> DependentLocality {
        DependentLocality {
            id: self.id,
            name: self.name,
        }
    }
}

/// Output of one subdivision level.
#[derive(Debug, Default)]
struct Level {
    native: Vec<Node>,
    /// Present when the record publishes latinized names; sorted by name.
    latin: Option<Vec<Node>>,
    post_codes: BTreeMap<String, PostCodeRule>,
}

/// Compiles an anchored subdivision pattern after checking its samples.
fn subdivision_post_code(
    context: &str,
    zip: &str,
    samples: &str,
) -> Result<PostCodeRule, GenerateError> {
    let pattern = anchored(zip);
    check_samples(context, &pattern, samples)?;
    compile_pattern(context, &pattern)
}

fn compile_pattern(context: &str, pattern: &str) -> Result<PostCodeRule, GenerateError> {
    PostCodeRule::new(pattern).map_err(|e| GenerateError::InvalidRegex {
        context: context.to_owned(),
        pattern: pattern.to_owned(),
        detail: e.to_string(),
    })
}

/// Walks one level of subdivisions, descending into child records while
/// `depth` allows. `language` is the suffix applied to child paths (`None`
/// for the default-language pass).
fn process_level<F: Fetcher + ?Sized>(
    fetcher: &F,
    columns: &SubdivisionColumns<'_>,
    language: Option<&str>,
    depth: usize,
) -> Result<Level, GenerateError> {
    let parent = strip_language(columns.id);
    if columns.has_latinized_names() && columns.latinized_names.len() != columns.len() {
        return Err(GenerateError::LatinizedCountMismatch {
            path: columns.id.to_owned(),
            latinized: columns.latinized_names.len(),
            native: columns.len(),
        });
    }

    let mut level = Level::default();
    let mut latin = Vec::new();

    for entry in columns.entries() {
        if entry.id.is_empty() {
            tracing::debug!(parent, key = entry.key, "skipping subdivision without an ID");
            continue;
        }
        if entry.excluded {
            tracing::debug!(
                parent,
                id = entry.id,
                "skipping subdivision with its own country record"
            );
            continue;
        }

        let context = format!("{parent}/{}", entry.key);
        let mut post_code = if entry.zip.is_empty() {
            None
        } else {
            Some(subdivision_post_code(&context, entry.zip, entry.zip_examples)?)
        };

        let mut node = Node::new(entry.id, entry.name, entry.key);
        let mut latin_node = entry
            .latinized_name
            .map(|name| Node::new(entry.id, name, entry.key));

        if entry.has_children && depth < MAX_DEPTH {
            let path = child_path(columns.id, entry.key, language);
            let record: SubdivisionRecord = decode(&path, &fetcher.fetch(&path)?)?;
            let child = process_level(fetcher, &record.subdivisions(), language, depth + 1)?;

            if !child.post_codes.is_empty() {
                let Some(rule) = post_code.as_mut() else {
                    return Err(GenerateError::OrphanSubdivisionRegex {
                        path,
                        id: entry.id.to_owned(),
                    });
                };
                rule.set_subdivisions(child.post_codes);
            }

            node.children = child.native;
            if let Some(latin_node) = latin_node.as_mut() {
                latin_node.children =
                    child
                        .latin
                        .ok_or_else(|| GenerateError::MissingLatinizedChildren {
                            path,
                            id: entry.id.to_owned(),
                        })?;
            }
        }

        if let Some(rule) = post_code {
            level.post_codes.insert(entry.id.to_owned(), rule);
        }
        level.native.push(node);
        latin.extend(latin_node);
    }

    if columns.has_latinized_names() {
        latin.sort_by(|a, b| a.name.cmp(&b.name));
        level.latin = Some(latin);
    }
    Ok(level)
}

fn into_areas(nodes: Vec<Node>) -> Vec<AdministrativeArea> {
    nodes
        .into_iter()
        .map(Node::into_administrative_area)
        .collect()
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

fn fetch_country<F: Fetcher + ?Sized>(
    fetcher: &F,
    path: &str,
) -> Result<CountryRecord, GenerateError> {
    decode(path, &fetcher.fetch(path)?)
}

/// Fetches and compiles the rules of country `code`.
///
/// The default-language pass supplies the canonical subdivision tree, the
/// latinized tree and the post-code subtree. Every other language the
/// country is published in adds one more tree, fetched from its
/// `data/{CC}--{lang}` record.
///
/// # Errors
///
/// Returns the first fetch, decode or sanity-check failure met while
/// compiling this country.
pub fn compile_country<F: Fetcher + ?Sized>(
    fetcher: &F,
    code: &str,
) -> Result<CountryRule, GenerateError> {
    let path = country_path(code);
    let record = fetch_country(fetcher, &path)?;

    let allowed = allowed_fields(&record.fmt);
    if !record.lfmt.is_empty() {
        let latinized = allowed_fields(&record.lfmt);
        if latinized.len() != allowed.len() {
            return Err(GenerateError::FormatMismatch {
                country: code.to_owned(),
                format: allowed.len(),
                latinized: latinized.len(),
            });
        }
    }

    let mut post_code_regex = if record.zip.is_empty() {
        PostCodeRule::default()
    } else {
        check_samples(code, &record.zip, &record.zipex)?;
        compile_pattern(code, &record.zip)?
    };

    let name = match lookup(NAME_OVERRIDES, code) {
        Some(name) => {
            tracing::debug!(country = code, name, "applying name override");
            name.to_owned()
        }
        None => record.name.clone(),
    };
    let post_code_prefix = match lookup(POST_CODE_PREFIX_OVERRIDES, code) {
        Some(prefix) => prefix.to_owned(),
        None => record.post_prefix.clone(),
    };
    let language = default_language(code, &record.lang);

    let mut rule = CountryRule {
        id: code.to_owned(),
        name,
        default_language: language.clone(),
        post_code_prefix,
        format: record.fmt.clone(),
        latinized_format: record.lfmt.clone(),
        administrative_area_name_type: field_name(code, &record.state_name_type)?,
        locality_name_type: field_name(code, &record.locality_name_type)?,
        dependent_locality_name_type: field_name(code, &record.sublocality_name_type)?,
        post_code_name_type: field_name(code, &record.zip_name_type)?,
        allowed_fields: allowed,
        required_fields: letter_fields(&record.require),
        upper: letter_fields(&record.upper),
        ..CountryRule::default()
    };

    let columns = record.subdivisions();
    if !columns.keys.is_empty() {
        let languages = record.language_list();
        if languages.is_empty() {
            return Err(GenerateError::MissingLanguages {
                country: code.to_owned(),
            });
        }

        let level = process_level(fetcher, &columns, None, 1)?;
        post_code_regex.set_subdivisions(level.post_codes);
        if let Some(latin) = level.latin {
            rule.administrative_areas
                .insert(LATIN_LANGUAGE.to_owned(), into_areas(latin));
        }
        rule.administrative_areas
            .insert(language.clone(), into_areas(level.native));

        for other in languages.into_iter().filter(|l| *l != language) {
            let path = language_path(&country_path(code), other);
            tracing::debug!(
                country = code,
                language = other,
                "fetching translated subdivisions"
            );
            let translated = fetch_country(fetcher, &path)?;
            let level = process_level(fetcher, &translated.subdivisions(), Some(other), 1)?;
            rule.administrative_areas
                .insert(other.to_owned(), into_areas(level.native));
        }
    }

    rule.post_code_regex = post_code_regex;
    tracing::debug!(
        country = code,
        languages = rule.administrative_areas.len(),
        "compiled country"
    );
    Ok(rule)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
