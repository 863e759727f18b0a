/// Address validation against a [`RuleStore`].
///
/// [`validate`] runs every check and collects all violations into a
/// [`ValidationResult`]; it never stops at the first problem. The single
/// exception is an unknown country code: without country rules no other check
/// is meaningful, so [`ValidationError::InvalidCountryCode`] is reported alone.
///
/// Checks, in order:
///
/// 1. required fields are non-blank;
/// 2. non-blank fields are allowed by the country's format;
/// 3. subdivision IDs exist, walked top-down (administrative area, then
///    locality, then dependent locality); only the first failing level is
///    reported;
/// 4. the post code matches the country regex and, level by level, any
///    regex specialized for the supplied subdivision IDs.
///
/// The subdivision and post-code checks are independent: an unknown area ID
/// is reported by check 3 and simply selects no specialized regex in check 4.
use std::fmt;

use crate::address::Address;
use crate::fields::{Field, join_fields};
use crate::resolve::ResolvedRule;
use crate::rules::{AdministrativeArea, PostCodeRule, find_administrative_area};
use crate::store::RuleStore;


// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// One validation failure.
///
/// Display strings are stable and machine-friendly (`invalid:PostCode`,
/// `missing required fields:Name,PostCode`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    /// The country code has no rules.
    #[error("invalid:Country")]
    InvalidCountryCode,
    /// Required fields are blank.
    #[error("missing required fields:{}", join_fields(.fields))]
    MissingRequiredFields {
        /// Country the rules came from.
        country: String,
        /// Every blank required field, in [`Field`] order.
        fields: Vec<Field>,
    },
    /// Fields are present that the country's format does not use.
    #[error("unsupported fields:{}", join_fields(.fields))]
    UnsupportedFields {
        /// Country the rules came from.
        country: String,
        /// Every disallowed non-blank field, in [`Field`] order.
        fields: Vec<Field>,
    },
    /// The administrative area is not a known subdivision ID.
    #[error("invalid:AdministrativeArea")]
    InvalidAdministrativeArea,
    /// The locality is not a known subdivision ID of the administrative area.
    #[error("invalid:Locality")]
    InvalidLocality,
    /// The dependent locality is not a known subdivision ID of the locality.
    #[error("invalid:DependentLocality")]
    InvalidDependentLocality,
    /// The post code does not match the applicable regex.
    #[error("invalid:PostCode")]
    InvalidPostCode,
}

impl ValidationError {
    /// The address field this error is about, when there is exactly one.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::InvalidCountryCode => Some(Field::Country),
            Self::InvalidAdministrativeArea => Some(Field::AdministrativeArea),
            Self::InvalidLocality => Some(Field::Locality),
            Self::InvalidDependentLocality => Some(Field::DependentLocality),
            Self::InvalidPostCode => Some(Field::PostCode),
            Self::MissingRequiredFields { .. } | Self::UnsupportedFields { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Every violation found in one validation pass, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a pre-built list of errors.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns `true` when no check failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` when no check failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All errors, in check order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns `true` if `error` was reported. Field lists must match exactly.
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.errors.contains(error)
    }

    /// Returns `true` if the country code was unknown.
    pub fn has_invalid_country_code(&self) -> bool {
        self.contains(&ValidationError::InvalidCountryCode)
    }

    /// Blank required fields, if any were reported.
    pub fn missing_required_fields(&self) -> Option<&[Field]> {
        self.errors.iter().find_map(|e| match e {
            ValidationError::MissingRequiredFields { fields, .. } => Some(fields.as_slice()),
            ValidationError::InvalidCountryCode
            | ValidationError::UnsupportedFields { .. }
            | ValidationError::InvalidAdministrativeArea
            | ValidationError::InvalidLocality
            | ValidationError::InvalidDependentLocality
            | ValidationError::InvalidPostCode => None,
        })
    }

    /// Disallowed non-blank fields, if any were reported.
    pub fn unsupported_fields(&self) -> Option<&[Field]> {
        self.errors.iter().find_map(|e| match e {
            ValidationError::UnsupportedFields { fields, .. } => Some(fields.as_slice()),
            ValidationError::InvalidCountryCode
            | ValidationError::MissingRequiredFields { .. }
            | ValidationError::InvalidAdministrativeArea
            | ValidationError::InvalidLocality
            | ValidationError::InvalidDependentLocality
            | ValidationError::InvalidPostCode => None,
        })
    }

    /// The subdivision-membership failure, if one was reported.
    pub fn subdivision_error(&self) -> Option<&ValidationError> {
        self.errors.iter().find(|e| {
            matches!(
                e,
                ValidationError::InvalidAdministrativeArea
                    | ValidationError::InvalidLocality
                    | ValidationError::InvalidDependentLocality
            )
        })
    }

    /// Returns `true` if the post code failed a regex.
    pub fn has_invalid_post_code(&self) -> bool {
        self.contains(&ValidationError::InvalidPostCode)
    }

    /// `Ok(())` when valid, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one check failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => f.write_str("no errors"),
            1 => write!(f, "1 error occurred: {}", self.errors[0]),
            n => {
                write!(f, "{n} errors occurred: ")?;
                for (i, error) in self.errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationResult {}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Validates `address` against the rules in `store`.
///
/// Deterministic and side-effect free; safe to call concurrently on a shared
/// store.
pub fn validate(store: &RuleStore, address: &Address) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(rule) = store.resolve(&address.country) else {
        result.push(ValidationError::InvalidCountryCode);
        return result;
    };

    if let Some(error) = check_required_fields(address, &rule) {
        result.push(error);
    }

    if let Some(error) = check_allowed_fields(address, &rule) {
        result.push(error);
    }

    if let Some(areas) = rule.default_administrative_areas() {
        if let Some(error) = check_subdivisions(address, areas) {
            result.push(error);
        }
    }

    if let Some(error) = check_post_code(address, rule.post_code_regex()) {
        result.push(error);
    }

    result
}

fn check_required_fields(address: &Address, rule: &ResolvedRule<'_>) -> Option<ValidationError> {
    let missing: Vec<Field> = rule
        .required_fields()
        .iter()
        .copied()
        .filter(|field| *field != Field::Country && !address.has_value(*field))
        .collect();

    if missing.is_empty() {
        return None;
    }
    Some(ValidationError::MissingRequiredFields {
        country: address.country.clone(),
        fields: missing,
    })
}

fn check_allowed_fields(address: &Address, rule: &ResolvedRule<'_>) -> Option<ValidationError> {
    let allowed = rule.allowed_fields();
    let unsupported: Vec<Field> = Field::OPTIONAL
        .into_iter()
        .filter(|field| address.has_value(*field) && !allowed.contains(field))
        .collect();

    if unsupported.is_empty() {
        return None;
    }
    Some(ValidationError::UnsupportedFields {
        country: address.country.clone(),
        fields: unsupported,
    })
}

fn check_subdivisions(address: &Address, areas: &[AdministrativeArea]) -> Option<ValidationError> {
    if !address.has_value(Field::AdministrativeArea) {
        return None;
    }

    let Some(area) = find_administrative_area(areas, &address.administrative_area) else {
        return Some(ValidationError::InvalidAdministrativeArea);
    };

    if !address.has_value(Field::Locality) || area.localities.is_empty() {
        return None;
    }

    let Some(locality) = area.locality(&address.locality) else {
        return Some(ValidationError::InvalidLocality);
    };

    if !address.has_value(Field::DependentLocality) || locality.dependent_localities.is_empty() {
        return None;
    }

    if locality
        .dependent_locality(&address.dependent_locality)
        .is_none()
    {
        return Some(ValidationError::InvalidDependentLocality);
    }

    None
}

fn check_post_code(address: &Address, root: &PostCodeRule) -> Option<ValidationError> {
    if !address.has_value(Field::PostCode) || !root.has_pattern() {
        return None;
    }

    let post_code = address.post_code.as_str();
    let path = [
        address.administrative_area.as_str(),
        address.locality.as_str(),
        address.dependent_locality.as_str(),
    ];

    let mut current = root;
    if !current.is_match(post_code) {
        return Some(ValidationError::InvalidPostCode);
    }
    for id in path {
        let Some(child) = current.subdivision(id) else {
            break;
        };
        if !child.is_match(post_code) {
            return Some(ValidationError::InvalidPostCode);
        }
        current = child;
    }

    None
}
