use thiserror::Error;

/// Which setting failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    BadMetricsFlag,
    BadBurstLimit,
    BadRateLimit,
}

impl ValidationErrorKind {
    /// Name of the setting as it is spelled in a service definition.
    pub fn setting(&self) -> &'static str {
        match self {
            ValidationErrorKind::BadMetricsFlag => "detailedMetricsEnabled",
            ValidationErrorKind::BadBurstLimit => "burstLimit",
            ValidationErrorKind::BadRateLimit => "rateLimit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteSettingsError {
    #[error("{message}")]
    Validation {
        kind: ValidationErrorKind,
        message: String,
    },

    #[error("{0}")]
    InvalidRoute(String),

    #[error("{0}")]
    DuplicateRoute(String),

    #[error("{0}")]
    InvalidDefinition(String),
}

impl RouteSettingsError {
    pub fn kind(&self) -> Option<ValidationErrorKind> {
        match self {
            RouteSettingsError::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteSettingsError>;
