use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{ChartsConfig, Config, LogLevel, LoggingConfig, ProviderConfig, ServerConfig};

/// Prefix for environment overrides, e.g. `DRAWDOWN__SERVER__PORT=8080`.
const ENV_PREFIX: &str = "DRAWDOWN";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. The file is
/// optional; values from the environment take precedence over it, and
/// anything left unset falls back to the defaults in `settings`.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name("config").required(false))
}

/// Like `load_config`, but reads an explicit file which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    build(config::File::from(path).required(true))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let file = write_toml(
            r#"
            [charts]
            output_dir = "out/charts"

            [provider]
            request_timeout = "45s"
            "#,
        );

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.charts.output_dir, PathBuf::from("out/charts"));
        assert_eq!(config.charts.width, 1200);
        assert_eq!(config.provider.request_timeout, Duration::from_secs(45));
        assert!(config.provider.base_url.contains("finance/chart"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let file = write_toml("[charts]\nwidth = 0\n");

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_explicit_file_is_a_load_error() {
        let err = load_config_from(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }
}
