//! unitctl - drive services through the service control binary.

use std::env;
use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use unitctl::config::{Settings, DEFAULT_CONFIG_PATH};
use unitctl::error::{ControlError, ControlResult, ValidationErrorKind};
use unitctl::resource::Manifest;
use unitctl::service::ServiceController;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let (config_path, positional) = match split_args(&args) {
        Ok(split) => split,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = match Settings::load_or_default(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        config = %config_path,
        binary = %settings.controller.binary_path.display(),
        "Starting {} v{}",
        NAME,
        VERSION
    );

    let controller = ServiceController::new(settings.controller_config());
    match run(&controller, &positional) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Operation failed");
            if let Err(e) = print_json(&ErrorReport {
                error: e.to_string(),
            }) {
                eprintln!("Error serializing output: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Serialize)]
struct ErrorReport {
    error: String,
}

#[derive(Serialize)]
struct StateReport<'a> {
    service: &'a str,
    state: unitctl::service::ObservedState,
}

/// Dispatch one command line. Returns whether the run succeeded.
fn run(controller: &ServiceController, positional: &[String]) -> Result<bool, ControlError> {
    let (verb, target) = match positional {
        [verb, target] => (verb.as_str(), target.as_str()),
        _ => {
            return Err(ControlError::Validation {
                kind: ValidationErrorKind::InvalidParameter {
                    param: "arguments".to_string(),
                    message: "expected <COMMAND> <SERVICE|MANIFEST>, see --help".to_string(),
                },
            })
        }
    };

    match verb {
        "start" => print_json(&controller.start(target)?)?,
        "stop" => print_json(&controller.stop(target)?)?,
        "restart" => print_json(&controller.restart(target)?)?,
        "enable" => print_json(&controller.enable(target)?)?,
        "disable" => print_json(&controller.disable(target)?)?,
        "is-enabled" => print_json(&StateReport {
            service: target,
            state: controller.is_enabled(target)?,
        })?,
        "probe-enabled" => print_json(&StateReport {
            service: target,
            state: controller.probe_enabled(target)?,
        })?,
        "is-active" => print_json(&StateReport {
            service: target,
            state: controller.is_active(target)?,
        })?,
        "apply" => {
            let report = Manifest::load(target)?.apply(controller);
            print_json(&report)?;
            if !report.success() {
                error!(failures = report.failures(), "Manifest applied with failures");
                return Ok(false);
            }
        }
        other => {
            return Err(ControlError::Validation {
                kind: ValidationErrorKind::InvalidParameter {
                    param: "command".to_string(),
                    message: format!("unknown command '{}'", other),
                },
            })
        }
    }

    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> ControlResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Drive services through the service control binary.

USAGE:
    {} [OPTIONS] <COMMAND> <SERVICE>
    {} [OPTIONS] apply <MANIFEST>

COMMANDS:
    start, stop, restart   Change the run state of a service
    enable                 Enable a service at boot
    disable                Disable a service (composed only unless
                           controller.execute_on_disable is set)
    is-enabled             Report enabled/disabled
    probe-enabled          Report enabled/disabled/unknown
    is-active              Report running/stopped/unknown
    apply                  Apply every [[service]] in a TOML manifest

OPTIONS:
    -c, --config <PATH>    Path to configuration file
                           [default: {}]
    -h, --help             Print help information
    -V, --version          Print version information
"#,
        NAME, VERSION, NAME, NAME, DEFAULT_CONFIG_PATH
    );
}

/// Separate `--config` from the positional arguments.
fn split_args(args: &[String]) -> Result<(String, Vec<String>), String> {
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--config" || arg == "-c" {
            config_path = iter
                .next()
                .cloned()
                .ok_or_else(|| format!("{} requires a path", arg))?;
        } else if let Some(path) = arg.strip_prefix("--config=") {
            config_path = path.to_string();
        } else {
            positional.push(arg.clone());
        }
    }

    Ok((config_path, positional))
}

/// Initialize logging based on settings. Logs go to stderr; stdout carries
/// the JSON report.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
