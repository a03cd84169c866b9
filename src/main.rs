//! PARK-CORE command-line entry point.
//!
//! ## CLI Subcommands
//!
//! - `park-core-cli` or `park-core-cli demo` - Sample park/unpark walkthrough (default)
//! - `park-core-cli status [--json]` - Lot availability
//! - `park-core-cli simulate [--json]` - Concurrent load with invariant audit
//! - `park-core-cli config show|defaults|validate` - Configuration

use std::process::ExitCode;

use park_core::cli::{self, config_cmd};
use park_core::config;
use park_core::telemetry;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("demo");
    let json_output = args.iter().skip(2).any(|a| a == "--json");

    let env_config = config::load();
    if let Err(e) = telemetry::init_logging(&env_config.log) {
        eprintln!("Logging disabled: {}", e);
    }

    match command {
        "demo" | "" => exit(cli::run_demo(&env_config)),
        "status" => exit(cli::run_status(&env_config, json_output)),
        "simulate" => exit(cli::run_simulate(&env_config, json_output)),
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show(&env_config);
                    ExitCode::SUCCESS
                }
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                "validate" => exit(config_cmd::run_validate(&env_config)),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_usage();
                    ExitCode::FAILURE
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("PARK-CORE {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "PARK-CORE - Concurrent parking spot allocation v{}

USAGE:
    park-core-cli [COMMAND] [OPTIONS]

COMMANDS:
    demo         Park, unpark and locate three sample vehicles (default)
    status       Show free and total spots per vehicle class
    simulate     Run concurrent random load, then audit the engine
    config       Manage configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    --json       JSON output for status and simulate

ENVIRONMENT:
    PARK_CORE_FLOORS       Number of floors (default: 2)
    PARK_CORE_LAYOUT       Inline layout, e.g. \"B-1,M-1,A-1;B-1,X-0,A-1\"
    PARK_CORE_LAYOUT_FILE  TOML layout file (overrides PARK_CORE_LAYOUT)
    PARK_CORE_LOG_LEVEL    Tracing filter (default: info)
    PARK_CORE_LOG_FORMAT   pretty | json (default: pretty)
    PARK_CORE_SIM_WORKERS  Simulation threads, 0 = one per CPU
    PARK_CORE_SIM_OPS      Operations per simulation thread (default: 1000)

EXIT CODES:
    0  Success
    1  Failure / audit findings
    2  Configuration error
",
        version
    );
}
