use crate::config::ConfigError;
use intake::ServeError;
use notion::NotionError;

#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("Notion client error: {0}")]
    Notion(#[from] NotionError),
    #[error("Notion connection test failed, check NOTION_TOKEN and NOTION_DATABASE_ID")]
    ConnectionTestFailed,
    #[error("server error: {0}")]
    Serve(#[from] ServeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not set up metrics: {0}")]
    Metrics(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder is already installed")]
    MetricsRecorderAlreadySet,
}
