use thiserror::Error;

/// Result type for header parsing
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while reading a spec test header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A spec coordinate did not follow `sections -> paragraph N -> sentence M`
    #[error("{path}: invalid spec link `{link}`: {reason}")]
    InvalidLink {
        path: String,
        link: String,
        reason: String,
    },

    /// The header names an area that is not configured
    #[error("{path}: unknown test area `{label}`")]
    UnknownArea { path: String, label: String },

    /// The header names a test type other than POSITIVE/NEGATIVE or pos/neg
    #[error("{path}: unknown test type `{value}`")]
    UnknownTestType { path: String, value: String },

    /// A numeric header field could not be read
    #[error("{path}: invalid number in `{field}`: `{value}`")]
    InvalidNumber {
        path: String,
        field: String,
        value: String,
    },

    /// A required header field is absent
    #[error("{path}: missing `{field}`")]
    MissingField { path: String, field: String },
}

impl ParseError {
    pub fn invalid_link(
        path: impl Into<String>,
        link: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidLink {
            path: path.into(),
            link: link.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            path: path.into(),
            field: field.into(),
        }
    }
}
