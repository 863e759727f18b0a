/// The defaulting resolver.
///
/// Countries only store what differs from the global defaults. For the
/// fallback fields (format, the four name types, and the allowed, required
/// and upper field sets) an empty country value is replaced by the `"ZZ"`
/// value. Subdivisions, the post-code rule tree, the latinized format and the
/// post-code prefix are never defaulted.
use std::collections::{BTreeMap, BTreeSet};

use crate::fields::{Field, FieldName};
use crate::rules::{AdministrativeArea, CountryRule, PostCodeRule};
use crate::store::RuleStore;

/// A borrowed view of a country rule merged with the `"ZZ"` defaults.
///
/// Resolution is free: accessors pick the country value or the default on
/// each call, so validation never copies subdivision trees. Use
/// [`ResolvedRule::to_rule`] for an owned, fully-merged [`CountryRule`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRule<'a> {
    rule: &'a CountryRule,
    defaults: &'a CountryRule,
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

fn set_or_default<'a>(
    value: &'a BTreeSet<Field>,
    fallback: &'a BTreeSet<Field>,
) -> &'a BTreeSet<Field> {
    if value.is_empty() { fallback } else { value }
}

impl<'a> ResolvedRule<'a> {
    /// Merges `rule` with `defaults`.
    pub fn new(rule: &'a CountryRule, defaults: &'a CountryRule) -> Self {
        Self { rule, defaults }
    }

    /// ISO 3166-1 alpha-2 code.
    pub fn id(&self) -> &'a str {
        &self.rule.id
    }

    /// Upstream display name.
    pub fn name(&self) -> &'a str {
        &self.rule.name
    }

    /// Language of the default subdivision tree. Never defaulted.
    pub fn default_language(&self) -> &'a str {
        &self.rule.default_language
    }

    /// Address format string, falling back to the `ZZ` format.
    pub fn format(&self) -> &'a str {
        or_default(&self.rule.format, &self.defaults.format)
    }

    /// Latin-script format string; empty when the country has none.
    pub fn latinized_format(&self) -> &'a str {
        &self.rule.latinized_format
    }

    /// Prefix written before post codes, e.g. `"CH-"`.
    pub fn post_code_prefix(&self) -> &'a str {
        &self.rule.post_code_prefix
    }

    /// Post-code rule tree. Never defaulted.
    pub fn post_code_regex(&self) -> &'a PostCodeRule {
        &self.rule.post_code_regex
    }

    /// Label for the administrative area, falling back to `ZZ`.
    pub fn administrative_area_name_type(&self) -> Option<FieldName> {
        self.rule
            .administrative_area_name_type
            .or(self.defaults.administrative_area_name_type)
    }

    /// Label for the locality, falling back to `ZZ`.
    pub fn locality_name_type(&self) -> Option<FieldName> {
        self.rule
            .locality_name_type
            .or(self.defaults.locality_name_type)
    }

    /// Label for the dependent locality, falling back to `ZZ`.
    pub fn dependent_locality_name_type(&self) -> Option<FieldName> {
        self.rule
            .dependent_locality_name_type
            .or(self.defaults.dependent_locality_name_type)
    }

    /// Label for the post code, falling back to `ZZ`.
    pub fn post_code_name_type(&self) -> Option<FieldName> {
        self.rule
            .post_code_name_type
            .or(self.defaults.post_code_name_type)
    }

    /// Fields the address may carry. An empty own set takes the `ZZ` set.
    pub fn allowed_fields(&self) -> &'a BTreeSet<Field> {
        set_or_default(&self.rule.allowed_fields, &self.defaults.allowed_fields)
    }

    /// Fields the address must carry. An empty own set takes the `ZZ` set.
    pub fn required_fields(&self) -> &'a BTreeSet<Field> {
        set_or_default(&self.rule.required_fields, &self.defaults.required_fields)
    }

    /// Fields written in upper case. An empty own set takes the `ZZ` set.
    pub fn upper(&self) -> &'a BTreeSet<Field> {
        set_or_default(&self.rule.upper, &self.defaults.upper)
    }

    /// Subdivision trees keyed by language tag.
    pub fn administrative_areas(&self) -> &'a BTreeMap<String, Vec<AdministrativeArea>> {
        &self.rule.administrative_areas
    }

    /// The subdivision tree of the default language, if any.
    pub fn default_administrative_areas(&self) -> Option<&'a [AdministrativeArea]> {
        self.rule.default_administrative_areas()
    }

    /// Materializes the merged rule.
    pub fn to_rule(&self) -> CountryRule {
        CountryRule {
            id: self.id().to_owned(),
            name: self.name().to_owned(),
            default_language: self.default_language().to_owned(),
            post_code_prefix: self.post_code_prefix().to_owned(),
            post_code_regex: self.post_code_regex().clone(),
            format: self.format().to_owned(),
            latinized_format: self.latinized_format().to_owned(),
            administrative_area_name_type: self.administrative_area_name_type(),
            locality_name_type: self.locality_name_type(),
            dependent_locality_name_type: self.dependent_locality_name_type(),
            post_code_name_type: self.post_code_name_type(),
            allowed_fields: self.allowed_fields().clone(),
            required_fields: self.required_fields().clone(),
            upper: self.upper().clone(),
            administrative_areas: self.administrative_areas().clone(),
        }
    }
}

impl RuleStore {
    /// Resolves `code` against the `"ZZ"` defaults.
    ///
    /// Returns `None` when the store has no rules for `code`.
    pub fn resolve(&self, code: &str) -> Option<ResolvedRule<'_>> {
        self.country(code)
            .map(|rule| ResolvedRule::new(rule, self.defaults()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
