use crate::config::MetricsConfig;
use crate::errors::RelayError;
use metrics_exporter_statsd::StatsdBuilder;
use shared::metrics_defs::describe_all;

/// Installs the StatsD recorder as the global metrics recorder.
pub fn init(config: &MetricsConfig) -> Result<(), RelayError> {
    let recorder = StatsdBuilder::from(config.statsd_host.clone(), config.statsd_port)
        .build(Some(config.prefix.as_str()))?;
    metrics::set_global_recorder(recorder).map_err(|_| RelayError::MetricsRecorderAlreadySet)?;

    describe_all(intake::metrics_defs::ALL_METRICS);
    describe_all(notion::metrics_defs::ALL_METRICS);

    tracing::info!(
        host = %config.statsd_host,
        port = config.statsd_port,
        "Sending metrics to StatsD"
    );
    Ok(())
}
