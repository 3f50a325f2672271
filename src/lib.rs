pub mod config;
pub mod error;
pub mod lookup;
pub mod resolver;
pub mod route_settings;
pub mod validation;

pub use config::Config;
pub use error::{Result, RouteSettingsError, ValidationErrorKind};
pub use resolver::{resolve_service, ResolvedSettings};
pub use route_settings::{RouteSettings, SettingValues};
