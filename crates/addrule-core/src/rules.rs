/// Compiled per-country address rules.
///
/// A [`CountryRule`] is the unit stored in a [`crate::RuleStore`]: field sets,
/// renameable field labels, the subdivision tree (per language) and the
/// post-code rule tree. Empty values mean "not specified by this country" and
/// are filled from the `"ZZ"` defaults by [`crate::RuleStore::resolve`].
use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fields::{Field, FieldName};

// ---------------------------------------------------------------------------
// CountryRule
// ---------------------------------------------------------------------------

/// The compiled rule set of one country (or of the `"ZZ"` defaults record).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryRule {
    /// ISO 3166-1 alpha-2 code this rule belongs to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Upstream display name of the country.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Language tag whose subdivision tree is canonical for validation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_language: String,
    /// Prefix printed before the post code (e.g. `"PR "`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post_code_prefix: String,
    /// Root of the post-code rule tree.
    #[serde(skip_serializing_if = "PostCodeRule::is_empty")]
    pub post_code_regex: PostCodeRule,
    /// Address format template (`%N%n%O%n%A...`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Latin-script address format template, when the country has one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub latinized_format: String,
    /// Label used for [`Field::AdministrativeArea`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area_name_type: Option<FieldName>,
    /// Label used for [`Field::Locality`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality_name_type: Option<FieldName>,
    /// Label used for [`Field::DependentLocality`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_locality_name_type: Option<FieldName>,
    /// Label used for [`Field::PostCode`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code_name_type: Option<FieldName>,
    /// Fields an address in this country may carry.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed_fields: BTreeSet<Field>,
    /// Fields an address in this country must carry.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub required_fields: BTreeSet<Field>,
    /// Fields conventionally written in upper case.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub upper: BTreeSet<Field>,
    /// Subdivision trees keyed by language tag.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub administrative_areas: BTreeMap<String, Vec<AdministrativeArea>>,
}

impl CountryRule {
    /// Returns the subdivision tree for the default language, if the country
    /// publishes one.
    pub fn default_administrative_areas(&self) -> Option<&[AdministrativeArea]> {
        self.administrative_areas
            .get(&self.default_language)
            .map(Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// Subdivisions
// ---------------------------------------------------------------------------

/// First-level subdivision (state, province, prefecture, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeArea {
    /// Stable key: the ISO 3166-2 subdivision code when upstream has one,
    /// otherwise the upstream dataset key.
    pub id: String,
    /// Display name in the language of the enclosing tree.
    pub name: String,
    /// Key used when printing a postal address (often an abbreviation).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postal_key: String,
    /// Child localities, in generation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub localities: Vec<Locality>,
}

impl AdministrativeArea {
    /// Finds a child locality by ID.
    pub fn locality(&self, id: &str) -> Option<&Locality> {
        self.localities.iter().find(|l| l.id == id)
    }
}

/// Second-level subdivision (city, post town, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    /// Upstream dataset key.
    pub id: String,
    /// Display name in the language of the enclosing tree.
    pub name: String,
    /// Child dependent localities, in generation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependent_localities: Vec<DependentLocality>,
}

impl Locality {
    /// Finds a child dependent locality by ID.
    pub fn dependent_locality(&self, id: &str) -> Option<&DependentLocality> {
        self.dependent_localities.iter().find(|d| d.id == id)
    }
}

/// Third-level subdivision (district, suburb, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentLocality {
    /// Upstream dataset key.
    pub id: String,
    /// Display name in the language of the enclosing tree.
    pub name: String,
}

/// Finds an administrative area by ID in a subdivision list.
pub fn find_administrative_area<'a>(
    areas: &'a [AdministrativeArea],
    id: &str,
) -> Option<&'a AdministrativeArea> {
    areas.iter().find(|a| a.id == id)
}

// ---------------------------------------------------------------------------
// PostCodeRule
// ---------------------------------------------------------------------------

/// A node of the post-code rule tree.
///
/// The root holds the country-wide pattern; `subdivisions` maps an
/// administrative-area ID to a more specific rule, whose own `subdivisions`
/// map locality IDs, and so on down to dependent localities. Patterns are
/// compiled once when the rule is built or deserialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPostCodeRule", into = "RawPostCodeRule")]
pub struct PostCodeRule {
    pattern: String,
    compiled: Option<Regex>,
    subdivisions: BTreeMap<String, PostCodeRule>,
}

impl PostCodeRule {
    /// Compiles `pattern` into a leaf rule. An empty pattern yields a rule
    /// that matches everything.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let compiled = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(&pattern)?)
        };
        Ok(Self {
            pattern,
            compiled,
            subdivisions: BTreeMap::new(),
        })
    }

    /// Builder-style variant of [`PostCodeRule::insert_subdivision`].
    #[must_use]
    pub fn with_subdivision(mut self, id: impl Into<String>, rule: PostCodeRule) -> Self {
        self.insert_subdivision(id, rule);
        self
    }

    /// Attaches a rule for the subdivision `id`, replacing any previous one.
    pub fn insert_subdivision(&mut self, id: impl Into<String>, rule: PostCodeRule) {
        self.subdivisions.insert(id.into(), rule);
    }

    /// Replaces every subdivision rule at once.
    pub fn set_subdivisions(&mut self, subdivisions: BTreeMap<String, PostCodeRule>) {
        self.subdivisions = subdivisions;
    }

    /// The source pattern (empty when unset).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` when this node carries a pattern.
    pub fn has_pattern(&self) -> bool {
        self.compiled.is_some()
    }

    /// Tests `post_code` against this node's pattern only.
    pub fn is_match(&self, post_code: &str) -> bool {
        self.compiled
            .as_ref()
            .is_none_or(|re| re.is_match(post_code))
    }

    /// Returns the child rule for subdivision `id`.
    pub fn subdivision(&self, id: &str) -> Option<&PostCodeRule> {
        self.subdivisions.get(id)
    }

    /// All child rules, keyed by subdivision ID.
    pub fn subdivisions(&self) -> &BTreeMap<String, PostCodeRule> {
        &self.subdivisions
    }

    /// Returns `true` when the node has neither a pattern nor children.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty() && self.subdivisions.is_empty()
    }
}

impl PartialEq for PostCodeRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.subdivisions == other.subdivisions
    }
}

impl Eq for PostCodeRule {}

/// Serialized shape of [`PostCodeRule`]: patterns only, no compiled state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawPostCodeRule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    regex: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    subdivisions: BTreeMap<String, RawPostCodeRule>,
}

impl TryFrom<RawPostCodeRule> for PostCodeRule {
    type Error = regex::Error;

    fn try_from(raw: RawPostCodeRule) -> Result<Self, Self::Error> {
        let mut rule = PostCodeRule::new(raw.regex)?;
        for (id, child) in raw.subdivisions {
            rule.insert_subdivision(id, PostCodeRule::try_from(child)?);
        }
        Ok(rule)
    }
}

impl From<PostCodeRule> for RawPostCodeRule {
    fn from(rule: PostCodeRule) -> Self {
        Self {
            regex: rule.pattern,
            subdivisions: rule
                .subdivisions
                .into_iter()
                .map(|(id, child)| (id, RawPostCodeRule::from(child)))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn rule(pattern: &str) -> PostCodeRule {
        PostCodeRule::new(pattern).expect("valid pattern")
    }

    #[test]
    fn empty_pattern_matches_anything() {
        let r = rule("");
        assert!(!r.has_pattern());
        assert!(r.is_match("whatever"));
        assert!(r.is_empty());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(PostCodeRule::new("(unclosed").is_err());
    }

    #[test]
    fn subdivision_lookup_by_id() {
        let root = rule(r"^\d{5}$").with_subdivision("X", rule(r"^9\d{4}$"));
        assert!(root.is_match("12345"));
        let area = root.subdivision("X").expect("area rule");
        assert!(!area.is_match("12345"));
        assert!(area.is_match("94043"));
        assert!(root.subdivision("Y").is_none());
    }

    #[test]
    fn equality_ignores_compiled_state() {
        let a = rule("^1").with_subdivision("A", rule("^12"));
        let b = rule("^1").with_subdivision("A", rule("^12"));
        assert_eq!(a, b);
        assert_ne!(a, rule("^1"));
    }

    #[test]
    fn serializes_as_nested_patterns() {
        let root = rule(r"\d{5}").with_subdivision("CA", rule("^9[0-5]"));
        let json = serde_json::to_string(&root).expect("serialize");
        assert_eq!(
            json,
            r#"{"regex":"\\d{5}","subdivisions":{"CA":{"regex":"^9[0-5]"}}}"#
        );
        let back: PostCodeRule = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, root);
        assert!(back.subdivision("CA").expect("child").is_match("94043"));
    }

    #[test]
    fn deserializing_invalid_pattern_fails() {
        let err = serde_json::from_str::<PostCodeRule>(r#"{"regex":"[a-"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn country_rule_omits_empty_fields() {
        let json = serde_json::to_string(&CountryRule::default()).expect("serialize");
        assert_eq!(json, "{}");
    }

    #[test]
    fn locality_and_dependent_locality_lookup() {
        let area = AdministrativeArea {
            id: "A".to_owned(),
            name: "Area".to_owned(),
            postal_key: String::new(),
            localities: vec![Locality {
                id: "L".to_owned(),
                name: "Loc".to_owned(),
                dependent_localities: vec![DependentLocality {
                    id: "D".to_owned(),
                    name: "Dep".to_owned(),
                }],
            }],
        };
        let locality = area.locality("L").expect("locality");
        assert_eq!(locality.name, "Loc");
        assert!(locality.dependent_locality("D").is_some());
        assert!(locality.dependent_locality("E").is_none());
        assert!(area.locality("M").is_none());
    }
}
