use crate::error::SettingsError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{ApiSettings, CoercionPolicy, LoggingSettings, Settings, StoreSettings};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "dealflow";
/// Prefix for environment overrides, e.g. `DEALFLOW__API__BASE_URL`.
pub const ENV_PREFIX: &str = "DEALFLOW";

/// Loads the client settings.
///
/// Sources, lowest precedence first: built-in defaults, the settings file
/// (`dealflow.toml` if present, or `path` which must exist), then
/// `DEALFLOW__SECTION__KEY` environment variables.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    load_with_environment(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<Settings, SettingsError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    let builder = config::Config::builder()
        .set_default("api.base_url", "http://127.0.0.1:8000")?
        .set_default("api.timeout_secs", 30)?
        .set_default("store.coercion", "lenient")?
        .set_default("logging.filter", "info")?
        .add_source(file)
        .add_source(environment)
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), SettingsError> {
    let base_url = settings.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(SettingsError::ValidationError(format!(
            "api.base_url must start with http:// or https://, got `{base_url}`"
        )));
    }
    if settings.api.timeout_secs == 0 {
        return Err(SettingsError::ValidationError(
            "api.timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_settings(
            r#"
            [api]
            base_url = "https://evaluator.example.com/"

            [store]
            coercion = "strict"
            "#,
        );

        let settings = load_settings(Some(file.path())).expect("settings load");
        assert_eq!(settings.api.base_url, "https://evaluator.example.com/");
        assert_eq!(settings.api.trimmed_base_url(), "https://evaluator.example.com");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.store.coercion, CoercionPolicy::Strict);
        assert_eq!(settings.logging.filter, "info");
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let file = write_settings(
            r#"
            [api]
            base_url = "https://evaluator.example.com"
            timeout_secs = 10
            "#,
        );
        let vars = config::Map::from_iter([
            ("DEALFLOW__API__TIMEOUT_SECS".to_string(), "45".to_string()),
            ("DEALFLOW__STORE__COERCION".to_string(), "strict".to_string()),
            ("DEALFLOW__LOGGING__FILTER".to_string(), "dealflow=debug".to_string()),
            ("OTHERAPP__API__TIMEOUT_SECS".to_string(), "1".to_string()),
        ]);

        let settings =
            load_with_environment(Some(file.path()), environment().source(Some(vars)))
                .expect("settings load");
        assert_eq!(settings.api.base_url, "https://evaluator.example.com");
        assert_eq!(settings.api.timeout_secs, 45);
        assert_eq!(settings.store.coercion, CoercionPolicy::Strict);
        assert_eq!(settings.logging.filter, "dealflow=debug");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let file = write_settings(
            r#"
            [api]
            base_url = "ftp://evaluator"
            "#,
        );

        match load_settings(Some(file.path())) {
            Err(SettingsError::ValidationError(message)) => assert!(message.contains("ftp://")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn explicit_path_must_exist() {
        let missing = Path::new("/definitely/not/here/dealflow.toml");
        assert!(matches!(
            load_settings(Some(missing)),
            Err(SettingsError::LoadError(_))
        ));
    }
}
