#![forbid(unsafe_code)]
//! sig - lexical SQL-injection taint detection and input sanitization.
//!
//! Detect-and-log, never detect-and-block: verdicts are advisory, the
//! sanitizer always runs on the original input, and analysis paths exit 0
//! whatever the verdict.
//!
//! Exit behavior:
//!   - 0: analysis completed (suspicious or clean alike)
//!   - 1: an operational failure outside analysis (e.g. `init` write error)
//!   - 2: argument errors, or the signature table failed to initialize

use clap::Parser;
use sql_injection_guard::cli::{self, Cli};
use sql_injection_guard::config::Config;
use sql_injection_guard::detector::inspect;
use sql_injection_guard::logging::DecisionLogger;
use sql_injection_guard::signatures::verify_signatures;
use std::io::{self, BufRead, IsTerminal};

/// Configure colored output from config and TTY detection.
fn configure_colors(config: &Config) {
    match config.general.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}

/// Read stdin line by line and analyze each (default mode, no subcommand).
fn run_filter_mode(config: &Config, logger: Option<&DecisionLogger>) -> i32 {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let verdict = inspect(&line);
        if let Some(logger) = logger {
            logger.log(&verdict, &line);
        }
        cli::print_analysis(&line, &verdict, config.general.verbose);
    }
    0
}

fn main() {
    let cli = Cli::parse();

    // A broken signature table must fail at startup, not miss matches.
    if let Err(e) = verify_signatures() {
        eprintln!("fatal: {e}");
        std::process::exit(2);
    }

    let config = Config::load();
    configure_colors(&config);
    let logger = DecisionLogger::new(&config.logging);

    let code = match cli.command {
        Some(command) => cli::handle_command(command, &config, logger.as_ref()),
        None => run_filter_mode(&config, logger.as_ref()),
    };
    std::process::exit(code);
}
