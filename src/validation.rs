use crate::config::namespaced;
use crate::error::{RouteSettingsError, ValidationErrorKind};
use serde_json::Value;

/// Type and range checks for raw setting values.
///
/// `None` means the setting was not given at all and is always accepted.
/// Anything present, `null` included, has to have the right shape.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validates the detailed metrics flag
    pub fn validate_metrics_flag(value: Option<&Value>) -> Result<Option<bool>, RouteSettingsError> {
        match value {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(Self::error(
                ValidationErrorKind::BadMetricsFlag,
                "detailedMetricsEnabled must be boolean.",
            )),
        }
    }

    /// Validates the burst limit
    pub fn validate_burst_limit(value: Option<&Value>) -> Result<Option<u64>, RouteSettingsError> {
        Self::validate_limit(value, ValidationErrorKind::BadBurstLimit)
    }

    /// Validates the rate limit
    pub fn validate_rate_limit(value: Option<&Value>) -> Result<Option<u64>, RouteSettingsError> {
        Self::validate_limit(value, ValidationErrorKind::BadRateLimit)
    }

    fn validate_limit(
        value: Option<&Value>,
        kind: ValidationErrorKind,
    ) -> Result<Option<u64>, RouteSettingsError> {
        let Some(value) = value else {
            return Ok(None);
        };

        as_non_negative_integer(value).map(Some).ok_or_else(|| {
            Self::error(
                kind,
                format!("{} must be greater than or equal to 0.", kind.setting()),
            )
        })
    }

    fn error(kind: ValidationErrorKind, message: impl AsRef<str>) -> RouteSettingsError {
        RouteSettingsError::Validation {
            kind,
            message: namespaced(message),
        }
    }
}

// Integral floats such as `10.0` count as integers.
fn as_non_negative_integer(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_u64() {
        return Some(n);
    }

    let n = number.as_f64()?;
    if n >= 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}
