use std::process::ExitCode;

use stockroom_harness::{StressConfig, scenario};
use stockroom_observability::TracingConfig;

fn main() -> ExitCode {
    stockroom_observability::init_with(&TracingConfig::pretty("info"));

    let config = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(iterations) => StressConfig::with_iterations(iterations),
            Err(_) => {
                tracing::error!(%arg, "iteration count must be a non-negative integer");
                return ExitCode::FAILURE;
            }
        },
        None => StressConfig::default(),
    };

    tracing::info!(?config, "running stress scenarios");

    let outcomes = match scenario::all(&config) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            tracing::error!(error = %e, "stress run aborted");
            return ExitCode::FAILURE;
        }
    };

    let mut clean = true;
    for outcome in &outcomes {
        if outcome.is_clean() {
            tracing::info!(scenario = outcome.name, observations = outcome.observations, "passed");
        } else {
            clean = false;
            for anomaly in &outcome.anomalies {
                tracing::error!(scenario = outcome.name, %anomaly, "anomaly");
            }
        }
    }

    if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
