/// Subdivision name and postal-key lookups.
///
/// Every lookup first picks a subdivision tree: the requested language when
/// the country publishes a tree for it, otherwise the country's default
/// language. It then walks the tree by ID. Lists hold tens of entries at most
/// so each level is a linear scan. A miss at any level yields `None`.
use crate::rules::{AdministrativeArea, find_administrative_area};
use crate::store::RuleStore;

impl RuleStore {
    /// Returns the subdivision tree of `code` in `language`, falling back to
    /// the country's default language.
    pub fn administrative_areas(
        &self,
        code: &str,
        language: Option<&str>,
    ) -> Option<&[AdministrativeArea]> {
        let rule = self.country(code)?;
        let requested = language.and_then(|lang| rule.administrative_areas.get(lang));
        requested
            .or_else(|| rule.administrative_areas.get(&rule.default_language))
            .map(Vec::as_slice)
    }

    fn find_area(
        &self,
        code: &str,
        area_id: &str,
        language: Option<&str>,
    ) -> Option<&AdministrativeArea> {
        find_administrative_area(self.administrative_areas(code, language)?, area_id)
    }

    /// Display name of an administrative area.
    pub fn administrative_area_name(
        &self,
        code: &str,
        area_id: &str,
        language: Option<&str>,
    ) -> Option<&str> {
        self.find_area(code, area_id, language)
            .map(|area| area.name.as_str())
    }

    /// Postal key of an administrative area, taken from the default-language
    /// tree.
    pub fn administrative_area_postal_key(&self, code: &str, area_id: &str) -> Option<&str> {
        self.find_area(code, area_id, None)
            .map(|area| area.postal_key.as_str())
    }

    /// Display name of a locality inside an administrative area.
    pub fn locality_name(
        &self,
        code: &str,
        area_id: &str,
        locality_id: &str,
        language: Option<&str>,
    ) -> Option<&str> {
        self.find_area(code, area_id, language)?
            .locality(locality_id)
            .map(|locality| locality.name.as_str())
    }

    /// Display name of a dependent locality inside a locality.
    pub fn dependent_locality_name(
        &self,
        code: &str,
        area_id: &str,
        locality_id: &str,
        dependent_locality_id: &str,
        language: Option<&str>,
    ) -> Option<&str> {
        self.find_area(code, area_id, language)?
            .locality(locality_id)?
            .dependent_locality(dependent_locality_id)
            .map(|dl| dl.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
