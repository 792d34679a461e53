//! # vmprobe CLI
//!
//! Plugin protocol: the report goes to stdout, diagnostics to stderr, and
//! the exit status carries the state (0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN).

use clap::Parser;
use vmprobe_base::api::{Probe, ProbeError};
use vmprobe_base::results::{PluginReport, ReportGenerator};
use vmprobe_base::{log_debug, log_error};
use vmprobe_sdk::cli::{Args, OutputFormat};
use vmprobe_sdk::create_check_registry;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let probe = match create_check_registry() {
        Ok(registry) => Probe::new(registry),
        Err(e) => {
            let check = args.check.as_deref().unwrap_or("vmprobe");
            finish(&ReportGenerator::from_failure(check, &ProbeError::from(e).user_message()), args.output);
        }
    };

    if args.list {
        for (name, description) in probe.registry().descriptions() {
            println!("{:<26}{}", name, description);
        }
        return;
    }

    let (check, inventory) = match (args.check.clone(), args.inventory.clone()) {
        (Some(check), Some(inventory)) => (check, inventory),
        // clap enforces both unless --list
        _ => std::process::exit(3),
    };

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            let e = ProbeError::from(e);
            log_error!("Configuration rejected", "error" => &e);
            finish(&ReportGenerator::from_failure(&check, &e.user_message()), args.output);
        }
    };

    log_debug!("Starting probe",
        "check" => &check,
        "inventory" => inventory.display(),
        "timeout_secs" => config.timeout_secs
    );

    let report = probe.run_with_timeout(&check, &config, &inventory);
    finish(&report, args.output);
}

fn finish(report: &PluginReport, output: OutputFormat) -> ! {
    match output {
        OutputFormat::Text => println!("{}", report.render_text()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log_error!("Failed to serialize report", "error" => e);
                println!("{}", report.render_text());
            }
        },
    }
    std::process::exit(report.exit_code())
}
