use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use wave_client::config::resolve_config;
use wave_client::config::validation::validate_config;
use wave_client::observability::logging;
use wave_client::wave::{exit_codes, ApprovalDecision};
use wave_client::{ClientConfig, WaveClient, WaveError, WaveHandle, WaveRequest};

#[derive(Parser)]
#[command(name = "wave-cli")]
#[command(about = "Issue single calls against the wave execution service", long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a wave and print the acknowledgement
    Start {
        #[arg(long)]
        agent_id: String,
        #[arg(long = "template")]
        wave_template_id: String,
        #[arg(long, default_value = "v1")]
        policy_version: String,
        #[arg(long, default_value = "")]
        intent: String,
        /// Context references as a JSON object
        #[arg(long, default_value = "{}")]
        context_json: String,
    },
    /// Show the current status of a wave
    Status { wave_id: String },
    /// Approve a pending approval request
    Approve {
        approval_request_id: String,
        #[arg(long)]
        approved_by: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Export the audit record of a completed wave
    Audit { wave_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_effective_config(cli.config.as_deref(), cli.url) {
        Ok(config) => config,
        Err(errors) => {
            for error in errors {
                eprintln!("Error: {}", error);
            }
            return ExitCode::from(exit_codes::INVALID as u8);
        }
    };
    logging::init(&config.observability.log_level);

    let client = match WaveClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(exit_codes::INVALID as u8);
        }
    };

    let result = match cli.command {
        Commands::Start {
            agent_id,
            wave_template_id,
            policy_version,
            intent,
            context_json,
        } => {
            let context_refs = match serde_json::from_str(&context_json) {
                Ok(refs) => refs,
                Err(e) => {
                    eprintln!("Error: --context-json must be a JSON object: {}", e);
                    return ExitCode::from(exit_codes::INVALID as u8);
                }
            };
            let request = WaveRequest {
                context_refs,
                ..WaveRequest::new(agent_id, wave_template_id)
                    .with_policy_version(policy_version)
                    .with_intent(intent)
            };
            print_result(client.start(&request).await)
        }
        Commands::Status { wave_id } => print_result(client.status(&WaveHandle::new(wave_id)).await),
        Commands::Approve {
            approval_request_id,
            approved_by,
            note,
        } => {
            let decision = ApprovalDecision { approved_by, note };
            print_result(client.approve(&approval_request_id, &decision).await)
        }
        Commands::Audit { wave_id } => print_result(client.audit(&WaveHandle::new(wave_id)).await),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Resolve the configuration, apply `--url`, and validate the result.
fn load_effective_config(path: Option<&Path>, url: Option<String>) -> Result<ClientConfig, Vec<String>> {
    let mut config = resolve_config(path).map_err(|e| vec![e.to_string()])?;
    if let Some(url) = url {
        config.service.base_url = url;
    }
    validate_config(&config)
        .map_err(|errors| errors.iter().map(ToString::to_string).collect::<Vec<_>>())?;
    Ok(config)
}

fn print_result<T: Serialize>(result: Result<T, WaveError>) -> Result<(), WaveError> {
    let value = result?;
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to render response: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_override_is_validated() {
        let errors = load_effective_config(None, Some("ftp://example.com".to_string())).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("service.base_url"));
    }

    #[test]
    fn test_url_override_replaces_base_url() {
        let config = load_effective_config(None, Some("http://10.0.0.5:8000".to_string())).unwrap();
        assert_eq!(config.service.base_url, "http://10.0.0.5:8000");
    }
}
