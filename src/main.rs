//! Wave lifecycle runner.
//!
//! Dispatches one Wave, follows it to a terminal state, prints the audit
//! record as JSON on stdout and exits with a code that names the outcome.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────── wave-client ─────────────────────────────┐
//!   │                                                                       │
//!   │  ┌──────────────┐   ┌──────────────┐   ┌───────────────────────────┐  │
//!   │  │  lifecycle   │──▶│     rpc      │──▶│        transport          │──┼──▶ execution
//!   │  │ orchestrator │   │   bindings   │   │ retry + backoff (reqwest) │  │    service
//!   │  └──────┬───────┘   └──────────────┘   └───────────────────────────┘  │
//!   │         │ cadence, deadline, approval ledger                          │
//!   │  ┌──────┴──────────────────────────────────────────────────────────┐  │
//!   │  │  config (TOML + WAVE_API_BASE)   observability (tracing, metrics)│  │
//!   │  └─────────────────────────────────────────────────────────────────┘  │
//!   └───────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

use wave_client::config::resolve_config;
use wave_client::config::validation::validate_config;
use wave_client::observability::logging;
use wave_client::wave::exit_codes;
use wave_client::{ErrorKind, WaveOrchestrator, WaveRequest};

#[derive(Parser)]
#[command(name = "wave-client", version)]
#[command(about = "Run one Wave to completion and print its audit record", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Execution service base URL (overrides config and WAVE_API_BASE).
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    agent_id: String,

    #[arg(long = "template")]
    wave_template_id: String,

    #[arg(long, default_value = "v1")]
    policy_version: String,

    #[arg(long, default_value = "")]
    intent: String,

    /// Context reference as key=value; JSON values are parsed, anything else is a string.
    #[arg(long = "context", value_parser = parse_context_ref)]
    context_refs: Vec<(String, Value)>,

    /// Hard deadline in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,
}

fn parse_context_ref(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return exit(exit_codes::INVALID);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }
    if let Some(deadline_ms) = cli.deadline_ms {
        config.polling.deadline_ms = deadline_ms;
    }
    if let Err(errors) = validate_config(&config) {
        for error in errors {
            eprintln!("configuration error: {}", error);
        }
        return exit(exit_codes::INVALID);
    }

    logging::init(&config.observability.log_level);

    tracing::info!(
        base_url = %config.service.base_url,
        max_retries = config.retries.max_retries,
        deadline_ms = config.polling.deadline_ms,
        "Configuration loaded"
    );

    let orchestrator = match WaveOrchestrator::from_config(&config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise transport");
            return exit(exit_codes::INVALID);
        }
    };

    let mut request = WaveRequest::new(cli.agent_id, cli.wave_template_id)
        .with_policy_version(cli.policy_version)
        .with_intent(cli.intent);
    for (key, value) in cli.context_refs {
        request = request.with_context_ref(key, value);
    }

    match orchestrator.run(&request).await {
        Ok(outcome) => {
            if !outcome.audit.is_valid() {
                tracing::warn!(
                    wave_id = %outcome.handle,
                    integrity_status = %outcome.audit.integrity_status,
                    "Audit integrity is not VALID"
                );
            }
            match serde_json::to_string_pretty(&outcome.audit) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!(error = %e, "Failed to render audit record"),
            }
            exit(exit_codes::OK)
        }
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation => tracing::error!(error = %e, "Request rejected before dispatch"),
                ErrorKind::Transport => tracing::error!(error = %e, "Execution service unreachable"),
                ErrorKind::Protocol => tracing::error!(error = %e, "Execution service broke the contract"),
                ErrorKind::Timeout => tracing::error!(error = %e, "Wave abandoned at deadline; remote outcome unknown"),
                ErrorKind::RemoteFailure => tracing::error!(error = %e, "Wave failed"),
            }
            exit(e.exit_code())
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_ref() {
        assert_eq!(
            parse_context_ref("input_csv_path=./data/sales.csv").unwrap(),
            ("input_csv_path".to_string(), Value::String("./data/sales.csv".into()))
        );
        assert_eq!(
            parse_context_ref("limit=100").unwrap(),
            ("limit".to_string(), Value::from(100))
        );
        assert!(parse_context_ref("no-separator").is_err());
        assert!(parse_context_ref("=value").is_err());
    }
}
