use crate::config::namespaced;
use crate::error::RouteSettingsError;
use crate::lookup::get_path;
use crate::route_settings::{RouteSettings, SettingValues};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info};

static ROUTE_SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z]+|\*)\s+(/\S*)\s*$").expect("valid route pattern"));

/// Defaults plus the settings of every `httpApi` route of a service
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedSettings {
    pub defaults: RouteSettings,
    pub routes: BTreeMap<String, RouteSettings>,
}

impl ResolvedSettings {
    pub fn get(&self, route_key: &str) -> Option<&RouteSettings> {
        self.routes.get(route_key)
    }
}

/// Resolves every route found under `service.functions`.
///
/// Functions are visited in document order and, within a function, events in
/// list order. Events without an `httpApi` key are not routes and are skipped.
pub fn resolve_service(serverless: &Value) -> Result<ResolvedSettings, RouteSettingsError> {
    let defaults = RouteSettings::build_default_route_settings(serverless)?;
    let mut routes = BTreeMap::new();

    let functions = get_path(serverless, &["service", "functions"]).and_then(Value::as_object);
    for (function_name, function) in functions.into_iter().flatten() {
        let events = get_path(function, &["events"]).and_then(Value::as_array);
        for event in events.into_iter().flatten() {
            let Some(http_api) = get_path(event, &["httpApi"]) else {
                continue;
            };

            let settings = match http_api {
                Value::String(shorthand) => shorthand_route(function_name, shorthand, &defaults)?,
                Value::Object(_) => {
                    RouteSettings::build_route_settings(function_name.as_str(), event, &defaults)?
                }
                other => {
                    return Err(RouteSettingsError::InvalidRoute(namespaced(format!(
                        "httpApi event of function '{}' must be a string or an object, got '{}'.",
                        function_name, other
                    ))))
                }
            };

            let route_key = settings.route_key();
            if routes.contains_key(&route_key) {
                return Err(RouteSettingsError::DuplicateRoute(namespaced(format!(
                    "route '{}' of function '{}' is already defined.",
                    route_key, function_name
                ))));
            }

            routes.insert(route_key, settings);
        }
    }

    info!(routes = routes.len(), "Resolved HTTP API route settings");

    Ok(ResolvedSettings { defaults, routes })
}

/// Parses a service definition and wraps it as `{ "service": ... }`.
pub fn parse_service_definition(contents: &str, is_json: bool) -> Result<Value, RouteSettingsError> {
    let service: Value = if is_json {
        serde_json::from_str(contents).map_err(|e| {
            RouteSettingsError::InvalidDefinition(namespaced(format!(
                "service definition is not valid JSON: {}",
                e
            )))
        })?
    } else {
        serde_yaml::from_str(contents).map_err(|e| {
            RouteSettingsError::InvalidDefinition(namespaced(format!(
                "service definition is not valid YAML: {}",
                e
            )))
        })?
    };

    Ok(json!({ "service": service }))
}

/// Parses `"GET /items"` or `"*"`. The method is kept as written, the same as
/// in the object form of an `httpApi` event.
pub fn parse_route_shorthand(route: &str) -> Result<(String, String), RouteSettingsError> {
    if route.trim() == "*" {
        return Ok(("*".to_string(), "*".to_string()));
    }

    let captures = ROUTE_SHORTHAND.captures(route).ok_or_else(|| {
        RouteSettingsError::InvalidRoute(namespaced(format!(
            "route '{}' must be '*' or '<method> <path>'.",
            route
        )))
    })?;

    Ok((captures[1].to_string(), captures[2].to_string()))
}

// A shorthand event has no settings block of its own.
fn shorthand_route(
    function_name: &str,
    route: &str,
    defaults: &RouteSettings,
) -> Result<RouteSettings, RouteSettingsError> {
    let (method, path) = parse_route_shorthand(route)?;
    debug!(function = function_name, route, "Resolving shorthand httpApi event");

    RouteSettings::new(
        Some(function_name.to_string()),
        Some(path),
        Some(method),
        SettingValues::default().or_defaults(defaults),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_route_shorthand() {
        assert_eq!(
            parse_route_shorthand("GET /items").unwrap(),
            ("GET".to_string(), "/items".to_string())
        );
        assert_eq!(
            parse_route_shorthand("post /items/{id}").unwrap(),
            ("post".to_string(), "/items/{id}".to_string())
        );
        assert_eq!(
            parse_route_shorthand("ANY /x").unwrap(),
            ("ANY".to_string(), "/x".to_string())
        );
        assert_eq!(
            parse_route_shorthand("*").unwrap(),
            ("*".to_string(), "*".to_string())
        );
        assert_eq!(
            parse_route_shorthand("* /any").unwrap(),
            ("*".to_string(), "/any".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_route_shorthand() {
        for route in ["", "GET", "/items", "GET items", "GET /a /b"] {
            let err = parse_route_shorthand(route).unwrap_err();
            assert!(matches!(err, RouteSettingsError::InvalidRoute(_)), "{route}");
        }
    }

    #[test]
    fn test_service_without_functions() {
        let resolved = resolve_service(&json!({ "service": {} })).unwrap();
        assert_eq!(resolved, ResolvedSettings::default());
    }

    #[test]
    fn test_skips_non_http_api_events() {
        let resolved = resolve_service(&json!({
            "service": {
                "functions": {
                    "worker": { "events": [{ "sqs": "arn:aws:sqs:queue" }] },
                    "cron": { "handler": "cron.handler" }
                }
            }
        }))
        .unwrap();
        assert!(resolved.routes.is_empty());
    }

    #[test]
    fn test_resolves_object_and_shorthand_events() {
        let resolved = resolve_service(&json!({
            "service": {
                "custom": { "routeSettings": { "burstLimit": 10, "rateLimit": 5 } },
                "functions": {
                    "list": {
                        "events": [
                            { "httpApi": { "path": "/items", "method": "GET",
                                           "routeSettings": { "burstLimit": 0 } } },
                            { "httpApi": "DELETE /items" }
                        ]
                    }
                }
            }
        }))
        .unwrap();

        let get = resolved.get("GET /items").unwrap();
        assert_eq!(get.burst_limit(), Some(0));
        assert_eq!(get.rate_limit(), Some(5));

        let delete = resolved.get("DELETE /items").unwrap();
        assert_eq!(delete.function_name(), Some("list"));
        assert_eq!(delete.burst_limit(), Some(10));
        assert_eq!(delete.rate_limit(), Some(5));
    }

    #[test]
    fn test_duplicate_routes_are_rejected() {
        let err = resolve_service(&json!({
            "service": {
                "functions": {
                    "a": { "events": [{ "httpApi": "GET /items" }] },
                    "b": { "events": [{ "httpApi": { "method": "GET", "path": "/items" } }] }
                }
            }
        }))
        .unwrap_err();

        assert!(matches!(err, RouteSettingsError::DuplicateRoute(_)));
        assert!(err.to_string().contains("'GET /items' of function 'b'"));
    }

    #[test]
    fn test_shorthand_and_object_routes_collide() {
        let err = resolve_service(&json!({
            "service": {
                "functions": {
                    "a": { "events": [{ "httpApi": "get /items" }] },
                    "b": { "events": [{ "httpApi": { "method": "get", "path": "/items" } }] }
                }
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("'get /items' of function 'b'"));

        let err = resolve_service(&json!({
            "service": {
                "functions": {
                    "c": { "events": [{ "httpApi": "ANY /x" }] },
                    "d": { "events": [{ "httpApi": { "method": "ANY", "path": "/x" } }] }
                }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, RouteSettingsError::DuplicateRoute(_)));
    }

    #[test]
    fn test_non_object_http_api_is_rejected() {
        for http_api in [json!(true), json!(null), json!([1]), json!(42)] {
            let err = resolve_service(&json!({
                "service": {
                    "functions": { "list": { "events": [{ "httpApi": http_api }] } }
                }
            }))
            .unwrap_err();
            assert!(matches!(err, RouteSettingsError::InvalidRoute(_)), "{err}");
            assert!(err.to_string().contains("function 'list'"));
        }
    }

    #[test]
    fn test_parse_service_definition() {
        let json_definition = parse_service_definition(r#"{ "service": "api" }"#, true).unwrap();
        assert_eq!(json_definition, json!({ "service": { "service": "api" } }));

        let yaml_definition = parse_service_definition("service: api\n", false).unwrap();
        assert_eq!(yaml_definition, json_definition);

        let err = parse_service_definition("{ not json", true).unwrap_err();
        assert!(matches!(err, RouteSettingsError::InvalidDefinition(_)));
        assert!(err.to_string().starts_with("[route-settings] service definition is not valid JSON"));
    }

    #[test]
    fn test_invalid_route_settings_abort_resolution() {
        let err = resolve_service(&json!({
            "service": {
                "functions": {
                    "list": { "events": [{ "httpApi": { "method": "GET", "path": "/items",
                                                        "routeSettings": { "rateLimit": -3 } } }] }
                }
            }
        }))
        .unwrap_err();
        assert_eq!(err.kind(), Some(ValidationErrorKind::BadRateLimit));
    }
}
