use clap::Parser;
use std::path::PathBuf;

/// Key under which settings are nested in both `service.custom` and each `httpApi` event.
pub const NAMESPACE_KEY: &str = "routeSettings";

/// Prefix for every user facing error message.
pub const APP_NAME: &str = "route-settings";

/// Formats a message the way all errors of this crate are reported.
pub fn namespaced(message: impl AsRef<str>) -> String {
    format!("[{}] {}", APP_NAME, message.as_ref())
}

/// Command line configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "route-settings", version, about)]
pub struct Config {
    /// Service definition file (YAML, or JSON when the extension is `.json`)
    #[arg(env = "ROUTE_SETTINGS_SERVICE_FILE")]
    pub service_file: PathBuf,

    /// Pretty-print the resolved settings
    #[arg(long, env = "ROUTE_SETTINGS_PRETTY")]
    pub pretty: bool,

    /// Log level used when `RUST_LOG` is not set
    #[arg(long, env = "ROUTE_SETTINGS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Whether the service file should be parsed as JSON rather than YAML
    pub fn is_json(&self) -> bool {
        self.service_file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}
