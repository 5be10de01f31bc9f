use clap::{Parser, Subcommand};
use config::Config;
use errors::RelayError;
use intake::AppState;
use notion::NotionClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod config;
mod errors;
mod logging;
mod statsd;

/// Relays webhook and chat payloads to a Notion database.
#[derive(Parser)]
struct Cli {
    /// Path to a YAML config file. Environment variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start the intake server
    Serve {
        /// Start even if Notion cannot be reached
        #[arg(long)]
        skip_connection_test: bool,
    },
    /// Check the Notion credentials and database, then exit
    CheckConnection,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = logging::init(&config.logging);

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            ExitCode::FAILURE
        }
    }
}

fn run(command: CliCommand, config: Config) -> Result<(), RelayError> {
    if let Some(metrics_config) = &config.metrics {
        statsd::init(metrics_config)?;
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match command {
        CliCommand::Serve {
            skip_connection_test,
        } => rt.block_on(serve(config, skip_connection_test)),
        CliCommand::CheckConnection => rt.block_on(check_connection(config)),
    }
}

async fn serve(config: Config, skip_connection_test: bool) -> Result<(), RelayError> {
    let client = NotionClient::new(&config.notion, config.production)?;

    if skip_connection_test {
        tracing::warn!("Skipping Notion connection test");
    } else if client.test_connection().await {
        tracing::info!(database_id = %client.database_id(), "Notion connection test succeeded");
    } else {
        return Err(RelayError::ConnectionTestFailed);
    }

    let state = AppState::new(Arc::new(client), &config.intake, config.production);

    tracing::info!(
        port = config.listener.port,
        production = config.production,
        "Starting relay"
    );
    intake::serve(&config.listener, state).await?;
    Ok(())
}

async fn check_connection(config: Config) -> Result<(), RelayError> {
    let client = NotionClient::new(&config.notion, config.production)?;

    if client.test_connection().await {
        tracing::info!(database_id = %client.database_id(), "Notion connection test succeeded");
        Ok(())
    } else {
        Err(RelayError::ConnectionTestFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DATABASE_ID: &str = "1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d";

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.notion.token = "test-token".into();
        config.notion.database_id = DATABASE_ID.into();
        config.notion.base_url = server.uri().parse().unwrap();
        config
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::parse_from([
            "relay",
            "serve",
            "--config",
            "relay.yaml",
            "--skip-connection-test",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("relay.yaml")));
        assert!(matches!(
            cli.command,
            CliCommand::Serve {
                skip_connection_test: true
            }
        ));
    }

    #[test]
    fn parse_check_connection() {
        let cli = Cli::parse_from(["relay", "check-connection"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, CliCommand::CheckConnection));
    }

    #[test]
    fn serve_fails_without_credentials() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = rt.block_on(serve(Config::default(), true)).unwrap_err();
        assert!(matches!(
            err,
            RelayError::Notion(notion::NotionError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn serve_fails_when_connection_test_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/databases/{DATABASE_ID}")))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = serve(config_for(&mock_server), false).await.unwrap_err();
        assert!(matches!(err, RelayError::ConnectionTestFailed));
    }

    #[tokio::test]
    async fn check_connection_reports_reachability() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/databases/{DATABASE_ID}")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        assert!(check_connection(config_for(&mock_server)).await.is_ok());

        mock_server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        let err = check_connection(config_for(&mock_server)).await.unwrap_err();
        assert!(matches!(err, RelayError::ConnectionTestFailed));
    }
}
