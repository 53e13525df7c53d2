use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Analysis, Band, Config, Dataset, LoggingSettings, Output};

/// Prefix of the environment variables that override file settings,
/// e.g. `TICKSTATS__DATASET__TICKER=AAPL`.
pub const ENV_PREFIX: &str = "TICKSTATS";

/// Loads the application configuration from the `config.toml` file.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml")
}

/// Reads the configuration file at `path`, applies environment overrides, deserializes
/// it into our strongly-typed `Config` struct and validates it.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

/// Parses configuration from TOML text without consulting files or the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ReturnSource;
    use std::path::PathBuf;

    #[test]
    fn minimal_file_uses_defaults() {
        let config = parse_config("[dataset]\nticker = \"WMT\"\n").unwrap();
        assert_eq!(config.dataset.input_path(), PathBuf::from("./WMT.csv"));
        assert_eq!(config.dataset.return_source, ReturnSource::Column);
        assert_eq!((config.analysis.start_year, config.analysis.end_year), (2014, 2018));
        assert_eq!(config.band.year, 2018);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.output.weekly_file("WMT"),
            PathBuf::from("output/WMT_weekly_return_volatility.csv")
        );
    }

    #[test]
    fn full_file_is_read() {
        let toml = r#"
            [dataset]
            ticker = "AAPL"
            data_dir = "data"
            file = "aapl_daily.csv"
            return_source = "derive"

            [analysis]
            start_year = 2015
            end_year = 2016

            [band]
            year = 2016
            low_return = -3.0
            high_return = 3.0

            [output]
            dir = "out"

            [logging]
            level = "debug"
            file = "logs/tickstats.log"
        "#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.dataset.input_path(), PathBuf::from("data/aapl_daily.csv"));
        assert_eq!(config.dataset.return_source, ReturnSource::Derive);
        assert_eq!(config.analysis.end_year, 2016);
        assert_eq!(config.band.low_return, -3.0);
        assert_eq!(config.logging.file, Some(PathBuf::from("logs/tickstats.log")));
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let toml = "[dataset]\nticker = \"WMT\"\n[analysis]\nstart_year = 2019\nend_year = 2014\n";
        assert!(matches!(parse_config(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn empty_band_is_rejected() {
        let toml = "[dataset]\nticker = \"WMT\"\n[band]\nyear = 2018\nlow_return = 1.0\nhigh_return = 1.0\n";
        assert!(matches!(parse_config(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_dataset_fails_to_load() {
        let toml = "[analysis]\nstart_year = 2014\nend_year = 2018\n";
        assert!(matches!(parse_config(toml), Err(ConfigError::LoadError(_))));
    }
}
