/// Generation-time errors.
///
/// These never reach the validator. A [`GenerateError`] raised while compiling
/// one country aborts that country only; the pool keeps going with the rest.
use addrule_core::StoreError;

/// Every way compiling the rule store can fail.
///
/// Each variant names the upstream path or country it is about so that a
/// failure list printed at the end of a run is actionable on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The upstream record could not be fetched.
    #[error("fetching {path}: {detail}")]
    Fetch { path: String, detail: String },

    /// The upstream record is not the JSON shape we expect.
    #[error("decoding {path}: {detail}")]
    Decode { path: String, detail: String },

    /// The latinized format references a different number of fields than the
    /// native format.
    #[error(
        "{country}: address format has {format} fields but latinized format has {latinized}"
    )]
    FormatMismatch {
        country: String,
        format: usize,
        latinized: usize,
    },

    /// A sample post code published upstream does not match its own regex.
    #[error("{context}: sample post code {sample:?} does not match {pattern}")]
    SampleMismatch {
        context: String,
        pattern: String,
        sample: String,
    },

    /// A post-code pattern does not compile.
    #[error("{context}: invalid post code regex {pattern}: {detail}")]
    InvalidRegex {
        context: String,
        pattern: String,
        detail: String,
    },

    /// Children of a subdivision carry post-code regexes but the subdivision
    /// itself has none.
    #[error("{path}: children of {id} have post code regexes but {id} has none")]
    OrphanSubdivisionRegex { path: String, id: String },

    /// The latinized subdivision list is not the same length as the native one.
    #[error("{path}: {latinized} latinized subdivisions for {native} subdivisions")]
    LatinizedCountMismatch {
        path: String,
        latinized: usize,
        native: usize,
    },

    /// A country lists subdivisions but no languages to fetch them in.
    #[error("{country}: has subdivision keys but no languages")]
    MissingLanguages { country: String },

    /// A `*_name_type` label has no [`addrule_core::FieldName`] counterpart.
    #[error("{context}: unknown field name {label:?}")]
    UnknownFieldName { context: String, label: String },

    /// A subdivision has latinized names but its fetched children do not.
    #[error("{path}: {id} has a latinized name but its children have none")]
    MissingLatinizedChildren { path: String, id: String },

    /// The `"ZZ"` defaults record failed or was never compiled.
    #[error("no \"ZZ\" defaults record was compiled")]
    MissingDefaults,

    /// The compiled store could not be serialized.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The worker pool shut down before every job reported back.
    #[error("worker pool: {detail}")]
    Pool { detail: String },
}

impl GenerateError {
    /// Returns `true` for failures of the upstream collaborator (network or
    /// payload) as opposed to failed sanity checks on well-formed data.
    pub fn is_upstream(&self) -> bool {
        match self {
            Self::Fetch { .. } | Self::Decode { .. } => true,
            Self::FormatMismatch { .. }
            | Self::SampleMismatch { .. }
            | Self::InvalidRegex { .. }
            | Self::OrphanSubdivisionRegex { .. }
            | Self::LatinizedCountMismatch { .. }
            | Self::MissingLanguages { .. }
            | Self::UnknownFieldName { .. }
            | Self::MissingLatinizedChildren { .. }
            | Self::MissingDefaults
            | Self::Store(_)
            | Self::Pool { .. } => false,
        }
    }
}
