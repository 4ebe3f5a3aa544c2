//! CLI argument parsing and command handling.
//!
//! Subcommands expose the detector and sanitizer as `sig detect` and
//! `sig sanitize`, plus the combined `sig analyze` driver. Detection is
//! advisory everywhere: every analysis path exits 0 whatever the verdict.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use crate::config::Config;
use crate::detector::{inspect, Verdict};
use crate::logging::DecisionLogger;
use crate::sanitizer::sanitize;
use crate::signatures::REGISTRY;

/// Lexical SQL-injection taint detection and input sanitization.
///
/// sig checks text against a fixed signature set (quotes, comment markers,
/// SQL keywords) and strips a small character set. It warns, it never
/// blocks. Omit the subcommand to read lines from stdin and analyze each.
#[derive(Parser, Debug)]
#[command(name = "sig")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (omit to analyze stdin line by line)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check text for injection signatures
    #[command(name = "detect")]
    Detect {
        /// Text to check
        text: String,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Show each matched signature with its span
        #[arg(long)]
        explain: bool,
    },

    /// Strip the sanitized character set from text
    #[command(name = "sanitize")]
    Sanitize {
        /// Text to sanitize
        text: String,
    },

    /// Detect, then sanitize, reporting both on the original text
    #[command(name = "analyze")]
    Analyze {
        /// Text to analyze
        text: String,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Run the built-in sample inputs through analyze
    #[command(name = "demo")]
    Demo,

    /// List the signature set
    #[command(name = "signatures")]
    Signatures {
        /// Show patterns alongside names and descriptions
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a sample configuration file
    #[command(name = "init")]
    Init {
        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    #[command(name = "config")]
    ShowConfig,
}

/// Output format for machine-consumable subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored when attached to a terminal.
    Pretty,
    /// One JSON object.
    Json,
}

/// Sample inputs for `sig demo`.
pub const DEMO_SAMPLES: [&str; 4] = [
    "SELECT * FROM users WHERE username = 'admin' --",
    "Hello, world!",
    "DROP TABLE users;",
    "name=John#email=john@example.com",
];

/// JSON payload for `detect --format json`.
#[derive(Debug, Serialize)]
struct DetectReport<'a> {
    input: &'a str,
    suspicious: bool,
    signatures: Vec<&'static str>,
}

/// JSON payload for `analyze --format json`.
#[derive(Debug, Serialize)]
struct AnalysisReport<'a> {
    input: &'a str,
    suspicious: bool,
    signatures: Vec<&'static str>,
    sanitized: String,
}

/// Dispatch a parsed subcommand. Returns the process exit code.
#[must_use]
pub fn handle_command(command: Command, config: &Config, logger: Option<&DecisionLogger>) -> i32 {
    match command {
        Command::Detect {
            text,
            format,
            explain,
        } => handle_detect(&text, format, explain, logger),
        Command::Sanitize { text } => {
            println!("{}", sanitize(&text));
            0
        }
        Command::Analyze { text, format } => handle_analyze(&text, format, config, logger),
        Command::Demo => handle_demo(config, logger),
        Command::Signatures { verbose } => handle_signatures(verbose),
        Command::Init { output, force } => handle_init(output.as_deref(), force),
        Command::ShowConfig => {
            print!("{}", config.to_toml());
            0
        }
    }
}

fn handle_detect(
    text: &str,
    format: OutputFormat,
    explain: bool,
    logger: Option<&DecisionLogger>,
) -> i32 {
    let verdict = inspect(text);
    if let Some(logger) = logger {
        logger.log(&verdict, text);
    }

    match format {
        OutputFormat::Json => {
            let report = DetectReport {
                input: text,
                suspicious: verdict.suspicious,
                signatures: verdict.signature_names(),
            };
            println!(
                "{}",
                serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            if verdict.suspicious {
                println!(
                    "{} possible SQL injection detected",
                    "SUSPICIOUS".red().bold()
                );
            } else {
                println!("{} no signatures matched", "clean".green());
            }
            if explain {
                for m in &verdict.matches {
                    println!(
                        "  {} at {}..{} ({})",
                        m.name.cyan(),
                        m.span.0,
                        m.span.1,
                        m.description
                    );
                }
            }
        }
    }
    0
}

fn handle_analyze(
    text: &str,
    format: OutputFormat,
    config: &Config,
    logger: Option<&DecisionLogger>,
) -> i32 {
    let verdict = inspect(text);
    if let Some(logger) = logger {
        logger.log(&verdict, text);
    }

    match format {
        OutputFormat::Json => {
            let report = AnalysisReport {
                input: text,
                suspicious: verdict.suspicious,
                signatures: verdict.signature_names(),
                sanitized: sanitize(text).into_owned(),
            };
            println!(
                "{}",
                serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            print_analysis(text, &verdict, config.general.verbose);
        }
    }
    0
}

/// Print the warn-or-safe message and the sanitized text for one input.
///
/// The sanitizer runs on the original input, after detection, regardless of
/// the verdict.
pub fn print_analysis(text: &str, verdict: &Verdict, verbose: bool) {
    if verdict.suspicious {
        println!(
            "{}",
            "Warning: possible SQL injection detected!".yellow().bold()
        );
        if verbose {
            println!("  matched: {}", verdict.signature_names().join(", "));
        }
    } else {
        println!("{}", "Input is clean.".green());
    }
    println!("Sanitized: {}", sanitize(text));
}

fn handle_demo(config: &Config, logger: Option<&DecisionLogger>) -> i32 {
    for sample in DEMO_SAMPLES {
        println!("Analyzing: {sample}");
        let verdict = inspect(sample);
        if let Some(logger) = logger {
            logger.log(&verdict, sample);
        }
        print_analysis(sample, &verdict, config.general.verbose);
        println!("-");
    }
    0
}

fn handle_signatures(verbose: bool) -> i32 {
    println!("{} signatures:", REGISTRY.len());
    for sig in REGISTRY.entries() {
        if verbose {
            println!(
                "  {:<24} {:<24} {}",
                sig.name.cyan(),
                sig.regex.as_str(),
                sig.description
            );
        } else {
            println!("  {:<24} {}", sig.name.cyan(), sig.description);
        }
    }
    0
}

fn handle_init(output: Option<&str>, force: bool) -> i32 {
    let sample = match Config::to_sample_toml() {
        Ok(sample) => sample,
        Err(e) => {
            eprintln!("{} {e}", "error:".red());
            return 1;
        }
    };

    match output {
        None => {
            print!("{sample}");
            0
        }
        Some(path) => {
            if std::path::Path::new(path).exists() && !force {
                eprintln!(
                    "{} {path} already exists (use --force to overwrite)",
                    "error:".red()
                );
                return 1;
            }
            match std::fs::write(path, sample) {
                Ok(()) => {
                    println!("Wrote {path}");
                    0
                }
                Err(e) => {
                    eprintln!("{} failed to write {path}: {e}", "error:".red());
                    1
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn demo_samples_match_expected_verdicts() {
        let expected = [true, false, true, true];
        for (sample, expect) in DEMO_SAMPLES.iter().zip(expected) {
            assert_eq!(
                crate::detector::check(sample),
                expect,
                "verdict mismatch for {sample:?}"
            );
        }
    }

    #[test]
    fn detect_and_analyze_always_exit_zero() {
        let config = Config::default();
        for text in ["DROP TABLE users;", "Hello, world!", ""] {
            let code = handle_command(
                Command::Detect {
                    text: text.to_string(),
                    format: OutputFormat::Json,
                    explain: false,
                },
                &config,
                None,
            );
            assert_eq!(code, 0);
            let code = handle_command(
                Command::Analyze {
                    text: text.to_string(),
                    format: OutputFormat::Json,
                },
                &config,
                None,
            );
            assert_eq!(code, 0);
        }
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").expect("write");
        let code = handle_init(Some(path.to_str().expect("utf-8 path")), false);
        assert_eq!(code, 1);
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "existing",
            "file must be untouched"
        );
    }

    #[test]
    fn init_overwrites_with_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").expect("write");
        let code = handle_init(Some(path.to_str().expect("utf-8 path")), true);
        assert_eq!(code, 0);
        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.contains("[general]"));
    }
}
