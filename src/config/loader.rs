//! Configuration loading from disk and the process environment.

use std::path::Path;
use std::fs;
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, apply environment overrides to, and validate a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
    finalize(config)
}

/// Defaults plus environment overrides, validated.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    finalize(AppConfig::default())
}

fn finalize(mut config: AppConfig) -> Result<AppConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply the deployment environment variables on top of a loaded config.
///
/// `PORT` replaces only the port of `listener.bind_address`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }
    if let Some(origin) = lookup("FRONTEND_URL") {
        config.cors.allowed_origin = origin;
    }

    let obs = &mut config.observability;
    if let Some(name) = lookup("SERVICE_NAME") {
        obs.service_name = name;
    }
    if let Some(env) = lookup("APP_ENV") {
        obs.environment = env;
    }
    if let Some(pod) = lookup("POD_NAME") {
        obs.pod = Some(pod);
    }
    if let Some(namespace) = lookup("POD_NAMESPACE") {
        obs.namespace = Some(namespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [observability]
            slow_request_threshold_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.observability.slow_request_threshold_ms, 250);
        assert_eq!(config.observability.sensitive_fields.len(), 4);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "127.0.0.1:3000".into();
        apply_env_overrides(&mut config, env(&[("PORT", "4100")]));
        assert_eq!(config.listener.bind_address, "127.0.0.1:4100");
    }

    #[test]
    fn test_metadata_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("SERVICE_NAME", "boards"),
                ("APP_ENV", "production"),
                ("POD_NAME", "boards-7d9f"),
                ("FRONTEND_URL", "https://kanban.example.com"),
            ]),
        );
        assert_eq!(config.observability.service_name, "boards");
        assert_eq!(config.observability.environment, "production");
        assert_eq!(config.observability.pod.as_deref(), Some("boards-7d9f"));
        assert_eq!(config.observability.namespace, None);
        assert_eq!(config.cors.allowed_origin, "https://kanban.example.com");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
