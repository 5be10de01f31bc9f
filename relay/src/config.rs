use intake::config::{IntakeConfig, Listener, ValidationError};
use notion::config::{NotionConfig, ValidationError as NotionValidationError};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Deserialize, Debug, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

fn default_metrics_prefix() -> String {
    "relay".into()
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub listener: Listener,
    pub notion: NotionConfig,
    pub intake: IntakeConfig,
    pub metrics: Option<MetricsConfig>,
    pub logging: LoggingConfig,
    /// Keeps upstream response bodies and secrets out of the logs.
    pub production: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Reads the optional config file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = var("NOTION_TOKEN").or_else(|| var("NOTION_API_KEY")) {
            self.notion.token = token;
        }
        if let Some(database_id) = var("NOTION_DATABASE_ID") {
            self.notion.database_id = database_id;
        }
        if let Some(port) = var("PORT") {
            self.listener.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value: port })?;
        }
        if let Some(env) = var("RELAY_ENV").or_else(|| var("FLASK_ENV")) {
            self.production = env.trim().eq_ignore_ascii_case("production");
        }
        if let Some(dsn) = var("SENTRY_DSN") {
            self.logging.sentry_dsn = Some(dsn);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listener.validate()?;
        self.notion.validate()?;
        self.intake.validate()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("invalid config: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("invalid notion config: {0}")]
    NotionValidationError(#[from] NotionValidationError),
}
