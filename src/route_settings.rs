//! Effective settings for a single HTTP API route.
//!
//! Service level settings live under `service.custom.routeSettings` and act as
//! defaults. A route overrides them under `httpApi.routeSettings` in its event
//! definition. A setting given at neither level stays unset so the account
//! level limit applies, which is different from an explicit `0` or `false`.

use crate::config::NAMESPACE_KEY;
use crate::error::RouteSettingsError;
use crate::lookup::{get_path, get_str};
use crate::validation::SettingsValidator;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const DETAILED_METRICS_ENABLED: &str = "detailedMetricsEnabled";
const BURST_LIMIT: &str = "burstLimit";
const RATE_LIMIT: &str = "rateLimit";

/// Raw setting values as found in a definition, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingValues {
    pub detailed_metrics_enabled: Option<Value>,
    pub burst_limit: Option<Value>,
    pub rate_limit: Option<Value>,
}

impl SettingValues {
    /// Reads the namespaced settings block found at `prefix`.
    pub fn extract(definition: &Value, prefix: &[&str]) -> Self {
        let setting = |name: &str| {
            let keys: Vec<&str> = prefix.iter().copied().chain([NAMESPACE_KEY, name]).collect();
            get_path(definition, &keys).cloned()
        };

        Self {
            detailed_metrics_enabled: setting(DETAILED_METRICS_ENABLED),
            burst_limit: setting(BURST_LIMIT),
            rate_limit: setting(RATE_LIMIT),
        }
    }

    /// Takes every value present here and falls back to `defaults` for the rest.
    pub fn or_defaults(self, defaults: &RouteSettings) -> Self {
        Self {
            detailed_metrics_enabled: self
                .detailed_metrics_enabled
                .or_else(|| defaults.detailed_metrics_enabled.map(Value::from)),
            burst_limit: self.burst_limit.or_else(|| defaults.burst_limit.map(Value::from)),
            rate_limit: self.rate_limit.or_else(|| defaults.rate_limit.map(Value::from)),
        }
    }
}

/// Validated settings for a route, or the service wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detailed_metrics_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    burst_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit: Option<u64>,
}

impl RouteSettings {
    /// Builds settings from raw values.
    ///
    /// `function_name`, `path` and `method` come from the deployment tool and
    /// are taken as is. The settings are checked in order and the first
    /// invalid one fails construction.
    pub fn new(
        function_name: Option<String>,
        path: Option<String>,
        method: Option<String>,
        values: SettingValues,
    ) -> Result<Self, RouteSettingsError> {
        Ok(Self {
            function_name,
            path,
            method,
            detailed_metrics_enabled: SettingsValidator::validate_metrics_flag(
                values.detailed_metrics_enabled.as_ref(),
            )?,
            burst_limit: SettingsValidator::validate_burst_limit(values.burst_limit.as_ref())?,
            rate_limit: SettingsValidator::validate_rate_limit(values.rate_limit.as_ref())?,
        })
    }

    /// Builds the defaults from `service.custom.routeSettings`.
    pub fn build_default_route_settings(serverless: &Value) -> Result<Self, RouteSettingsError> {
        let values = SettingValues::extract(serverless, &["service", "custom"]);
        let defaults = Self::new(None, None, None, values)?;

        debug!(
            detailed_metrics_enabled = ?defaults.detailed_metrics_enabled,
            burst_limit = ?defaults.burst_limit,
            rate_limit = ?defaults.rate_limit,
            "Resolved default route settings"
        );

        Ok(defaults)
    }

    /// Builds the settings of one `httpApi` event, falling back to `defaults`
    /// for every setting the event leaves out.
    pub fn build_route_settings(
        function_name: impl Into<String>,
        event: &Value,
        defaults: &RouteSettings,
    ) -> Result<Self, RouteSettingsError> {
        let path = get_str(event, &["httpApi", "path"]).map(str::to_string);
        let method = get_str(event, &["httpApi", "method"]).map(str::to_string);
        let values = SettingValues::extract(event, &["httpApi"]).or_defaults(defaults);

        let settings = Self::new(Some(function_name.into()), path, method, values)?;

        debug!(
            route = %settings.route_key(),
            function = settings.function_name.as_deref().unwrap_or_default(),
            detailed_metrics_enabled = ?settings.detailed_metrics_enabled,
            burst_limit = ?settings.burst_limit,
            rate_limit = ?settings.rate_limit,
            "Resolved route settings"
        );

        Ok(settings)
    }

    /// `"<method> <path>"`, only meaningful for route level settings.
    pub fn route_key(&self) -> String {
        format!(
            "{} {}",
            self.method.as_deref().unwrap_or_default(),
            self.path.as_deref().unwrap_or_default()
        )
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn detailed_metrics_enabled(&self) -> Option<bool> {
        self.detailed_metrics_enabled
    }

    pub fn burst_limit(&self) -> Option<u64> {
        self.burst_limit
    }

    pub fn rate_limit(&self) -> Option<u64> {
        self.rate_limit
    }
}
