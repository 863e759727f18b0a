/// Externalized, fully-defaulted view of a country's rules.
///
/// [`CountryData`] is what the outside world sees: defaults already applied,
/// field sets as ordered lists, and the post-code tree as plain patterns. It
/// is safe to serialize and hand to a form renderer: every field and label
/// travels as `{"id": ..., "display": ...}`.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{Field, FieldName};
use crate::resolve::ResolvedRule;
use crate::rules::{AdministrativeArea, CountryRule, PostCodeRule};
use crate::store::RuleStore;

/// A field or label paired with its display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled<T> {
    pub id: T,
    /// Human-readable form label.
    pub display: String,
}

impl From<Field> for Labeled<Field> {
    fn from(id: Field) -> Self {
        Self {
            id,
            display: id.readable().to_owned(),
        }
    }
}

impl From<FieldName> for Labeled<FieldName> {
    fn from(id: FieldName) -> Self {
        Self {
            id,
            display: id.readable().to_owned(),
        }
    }
}

fn labeled<'a, T>(fields: impl IntoIterator<Item = &'a T>) -> Vec<Labeled<T>>
where
    T: Copy + 'a,
    Labeled<T>: From<T>,
{
    fields.into_iter().copied().map(Labeled::from).collect()
}

fn ids<T>(fields: Vec<Labeled<T>>) -> impl Iterator<Item = T> {
    fields.into_iter().map(|f| f.id)
}

/// Resolved rules of one country, ready for external consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryData {
    /// ISO 3166-1 alpha-2 code.
    pub id: String,
    /// Upstream display name.
    pub name: String,
    pub default_language: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latinized_format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_code_prefix: String,
    /// Fields the address must carry, in [`Field`] order.
    pub required_fields: Vec<Labeled<Field>>,
    /// Fields the address may carry, in [`Field`] order.
    pub allowed_fields: Vec<Labeled<Field>>,
    /// Fields conventionally written in upper case, in [`Field`] order.
    #[serde(default)]
    pub upper: Vec<Labeled<Field>>,
    pub administrative_area_name_type: Option<Labeled<FieldName>>,
    pub locality_name_type: Option<Labeled<FieldName>>,
    pub dependent_locality_name_type: Option<Labeled<FieldName>>,
    pub post_code_name_type: Option<Labeled<FieldName>>,
    /// Post-code rule tree (patterns only).
    #[serde(default, skip_serializing_if = "PostCodeRule::is_empty")]
    pub post_code_regex: PostCodeRule,
    /// Subdivision trees keyed by language tag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub administrative_areas: BTreeMap<String, Vec<AdministrativeArea>>,
}

impl From<ResolvedRule<'_>> for CountryData {
    fn from(rule: ResolvedRule<'_>) -> Self {
        Self {
            id: rule.id().to_owned(),
            name: rule.name().to_owned(),
            default_language: rule.default_language().to_owned(),
            format: rule.format().to_owned(),
            latinized_format: rule.latinized_format().to_owned(),
            post_code_prefix: rule.post_code_prefix().to_owned(),
            required_fields: labeled(rule.required_fields()),
            allowed_fields: labeled(rule.allowed_fields()),
            upper: labeled(rule.upper()),
            administrative_area_name_type: rule.administrative_area_name_type().map(Labeled::from),
            locality_name_type: rule.locality_name_type().map(Labeled::from),
            dependent_locality_name_type: rule.dependent_locality_name_type().map(Labeled::from),
            post_code_name_type: rule.post_code_name_type().map(Labeled::from),
            post_code_regex: rule.post_code_regex().clone(),
            administrative_areas: rule.administrative_areas().clone(),
        }
    }
}

impl From<CountryData> for CountryRule {
    fn from(data: CountryData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            default_language: data.default_language,
            post_code_prefix: data.post_code_prefix,
            post_code_regex: data.post_code_regex,
            format: data.format,
            latinized_format: data.latinized_format,
            administrative_area_name_type: data.administrative_area_name_type.map(|l| l.id),
            locality_name_type: data.locality_name_type.map(|l| l.id),
            dependent_locality_name_type: data.dependent_locality_name_type.map(|l| l.id),
            post_code_name_type: data.post_code_name_type.map(|l| l.id),
            allowed_fields: ids(data.allowed_fields).collect(),
            required_fields: ids(data.required_fields).collect(),
            upper: ids(data.upper).collect(),
            administrative_areas: data.administrative_areas,
        }
    }
}

impl RuleStore {
    /// Returns the externalized rules for `code`, defaults applied.
    pub fn get_country(&self, code: &str) -> Option<CountryData> {
        self.resolve(code).map(CountryData::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::BTreeSet;

    use super::*;

    fn store() -> RuleStore {
        let defaults = CountryRule {
            format: "%N%n%O%n%A%n%C".to_owned(),
            locality_name_type: Some(FieldName::City),
            allowed_fields: [Field::Name, Field::StreetAddress, Field::Locality]
                .into_iter()
                .collect(),
            required_fields: [Field::StreetAddress, Field::Locality].into_iter().collect(),
            ..CountryRule::default()
        };
        let us = CountryRule {
            id: "US".to_owned(),
            name: "UNITED STATES".to_owned(),
            default_language: "en".to_owned(),
            format: "%N%n%O%n%A%n%C, %S %Z".to_owned(),
            post_code_name_type: Some(FieldName::ZipCode),
            post_code_regex: PostCodeRule::new(r"(\d{5})(?:[ \-](\d{4}))?")
                .expect("valid")
                .with_subdivision("CA", PostCodeRule::new("^9[0-5]").expect("valid")),
            required_fields: [
                Field::StreetAddress,
                Field::Locality,
                Field::AdministrativeArea,
                Field::PostCode,
            ]
            .into_iter()
            .collect(),
            ..CountryRule::default()
        };
        let mut countries = BTreeMap::new();
        countries.insert("US".to_owned(), us);
        countries.insert("AG".to_owned(), CountryRule::default());
        RuleStore::new(defaults, countries)
    }

    #[test]
    fn get_country_applies_defaults() {
        let data = store().get_country("AG").expect("known");
        assert_eq!(data.format, "%N%n%O%n%A%n%C");
        assert_eq!(
            data.required_fields,
            vec![Field::StreetAddress.into(), Field::Locality.into()]
        );
        assert_eq!(data.locality_name_type, Some(FieldName::City.into()));
    }

    #[test]
    fn field_lists_are_ordered() {
        let data = store().get_country("US").expect("known");
        let required: Vec<Field> = data.required_fields.iter().map(|f| f.id).collect();
        assert_eq!(
            required,
            vec![
                Field::StreetAddress,
                Field::Locality,
                Field::AdministrativeArea,
                Field::PostCode
            ]
        );
    }

    #[test]
    fn fields_and_labels_carry_display_strings() {
        let data = store().get_country("US").expect("known");
        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(
            json["required_fields"][0],
            serde_json::json!({"id": "StreetAddress", "display": "Street Address"})
        );
        assert_eq!(
            json["required_fields"][2]["display"],
            "Administrative Area"
        );
        assert_eq!(
            json["post_code_name_type"],
            serde_json::json!({"id": "ZipCode", "display": "ZIP Code"})
        );
        assert_eq!(json["locality_name_type"]["display"], "City");
        assert!(json["dependent_locality_name_type"].is_null());
    }

    #[test]
    fn unknown_country_has_no_data() {
        assert!(store().get_country("QQ").is_none());
        assert!(store().get_country("ZZ").is_none());
    }

    #[test]
    fn reresolving_country_data_keeps_field_sets() {
        let s = store();
        for code in ["AG", "US"] {
            let direct = s.resolve(code).expect("known");
            let data = s.get_country(code).expect("known");
            let rule = CountryRule::from(data);
            let mut countries = BTreeMap::new();
            countries.insert(code.to_owned(), rule);
            let rebuilt = RuleStore::new(s.defaults().clone(), countries);
            let again = rebuilt.resolve(code).expect("known");
            assert_eq!(again.required_fields(), direct.required_fields());
            assert_eq!(again.allowed_fields(), direct.allowed_fields());
        }
    }

    #[test]
    fn serializes_post_code_tree_as_patterns() {
        let data = store().get_country("US").expect("known");
        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(
            json["post_code_regex"]["subdivisions"]["CA"]["regex"],
            "^9[0-5]"
        );
        let back: CountryData = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, data);
        let upper: BTreeSet<Field> = ids(back.upper).collect();
        assert!(upper.is_empty());
    }
}
