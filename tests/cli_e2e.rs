//! End-to-end tests for CLI flows.
//!
//! These tests drive the built `sig` binary, verify output in both formats,
//! and pin the advisory exit-code contract: analysis always exits 0,
//! suspicious or clean alike.
//!
//! # Running
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use std::io::Write;
use std::process::{Command, Stdio};

/// Path to the sig binary (built in debug mode for tests).
fn sig_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/
    path.push("sig");
    path
}

/// Run sig with arguments under a cleared environment and a temp CWD, so
/// tests don't depend on user/project configs.
fn run_sig(args: &[&str]) -> std::process::Output {
    run_sig_with_env(args, &[], None)
}

fn run_sig_with_env(
    args: &[&str],
    extra_env: &[(&str, &str)],
    stdin_data: Option<&str>,
) -> std::process::Output {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::create_dir_all(temp.path().join(".git")).expect("failed to create .git dir");

    let home_dir = temp.path().join("home");
    let xdg_config_dir = temp.path().join("xdg_config");
    std::fs::create_dir_all(&home_dir).expect("failed to create HOME dir");
    std::fs::create_dir_all(&xdg_config_dir).expect("failed to create XDG_CONFIG_HOME dir");

    let mut cmd = Command::new(sig_binary());
    cmd.args(args)
        .env_clear()
        .env("HOME", &home_dir)
        .env("XDG_CONFIG_HOME", &xdg_config_dir)
        .current_dir(temp.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in extra_env {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().expect("failed to spawn sig");
    if let Some(data) = stdin_data {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        stdin
            .write_all(data.as_bytes())
            .expect("failed to write stdin");
    }
    drop(child.stdin.take());
    child.wait_with_output().expect("failed to wait for sig")
}

fn stdout_str(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ============================================================================
// detect
// ============================================================================

mod detect_tests {
    use super::*;

    #[test]
    fn suspicious_input_exits_zero() {
        let output = run_sig(&["detect", "DROP TABLE users;"]);
        assert!(output.status.success(), "detect is advisory, never blocking");
        assert!(stdout_str(&output).contains("SUSPICIOUS"));
    }

    #[test]
    fn clean_input_exits_zero() {
        let output = run_sig(&["detect", "Hello, world!"]);
        assert!(output.status.success());
        assert!(stdout_str(&output).contains("clean"));
    }

    #[test]
    fn json_format_reports_signatures() {
        let output = run_sig(&["detect", "DROP TABLE users;", "--format", "json"]);
        assert!(output.status.success());
        let parsed: serde_json::Value =
            serde_json::from_str(stdout_str(&output).trim()).expect("valid JSON");
        assert_eq!(parsed["suspicious"], true);
        assert_eq!(parsed["signatures"][0], "keyword-drop");
    }

    #[test]
    fn json_format_clean_input() {
        let output = run_sig(&["detect", "Hello, world!", "--format", "json"]);
        let parsed: serde_json::Value =
            serde_json::from_str(stdout_str(&output).trim()).expect("valid JSON");
        assert_eq!(parsed["suspicious"], false);
        assert_eq!(parsed["signatures"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn explain_lists_matches_with_spans() {
        let output = run_sig(&["detect", "SELECT 'x'", "--explain"]);
        let stdout = stdout_str(&output);
        assert!(stdout.contains("single-quote"));
        assert!(stdout.contains("keyword-select"));
    }

    #[test]
    fn empty_argument_is_clean() {
        let output = run_sig(&["detect", ""]);
        assert!(output.status.success());
        assert!(stdout_str(&output).contains("clean"));
    }
}

// ============================================================================
// sanitize
// ============================================================================

mod sanitize_tests {
    use super::*;

    #[test]
    fn strips_flagged_characters() {
        let output = run_sig(&["sanitize", "DROP TABLE users;"]);
        assert!(output.status.success());
        assert_eq!(stdout_str(&output), "DROP TABLE users\n");
    }

    #[test]
    fn passes_clean_text_through() {
        let output = run_sig(&["sanitize", "Hello, world!"]);
        assert_eq!(stdout_str(&output), "Hello, world!\n");
    }

    #[test]
    fn quoted_login_bypass_scenario() {
        let output = run_sig(&[
            "sanitize",
            "SELECT * FROM users WHERE username = 'admin' --",
        ]);
        assert_eq!(
            stdout_str(&output),
            "SELECT * FROM users WHERE username = admin \n"
        );
    }
}

// ============================================================================
// analyze
// ============================================================================

mod analyze_tests {
    use super::*;

    #[test]
    fn reports_warning_then_sanitized() {
        let output = run_sig(&["analyze", "DROP TABLE users;"]);
        assert!(output.status.success());
        let stdout = stdout_str(&output);
        assert!(stdout.contains("Warning: possible SQL injection detected!"));
        assert!(stdout.contains("Sanitized: DROP TABLE users"));
    }

    #[test]
    fn reports_clean_then_sanitized() {
        let output = run_sig(&["analyze", "Hello, world!"]);
        let stdout = stdout_str(&output);
        assert!(stdout.contains("Input is clean."));
        assert!(stdout.contains("Sanitized: Hello, world!"));
    }

    #[test]
    fn json_format_carries_all_fields() {
        let output = run_sig(&[
            "analyze",
            "name=John#email=john@example.com",
            "--format",
            "json",
        ]);
        let parsed: serde_json::Value =
            serde_json::from_str(stdout_str(&output).trim()).expect("valid JSON");
        assert_eq!(parsed["input"], "name=John#email=john@example.com");
        assert_eq!(parsed["suspicious"], true);
        assert_eq!(parsed["signatures"][0], "hash-comment");
        assert_eq!(parsed["sanitized"], "name=Johnemail=john@example.com");
    }
}

// ============================================================================
// demo
// ============================================================================

mod demo_tests {
    use super::*;

    #[test]
    fn runs_all_builtin_samples() {
        let output = run_sig(&["demo"]);
        assert!(output.status.success());
        let stdout = stdout_str(&output);
        assert_eq!(stdout.matches("Analyzing: ").count(), 4);
        assert_eq!(
            stdout
                .matches("Warning: possible SQL injection detected!")
                .count(),
            3
        );
        assert_eq!(stdout.matches("Input is clean.").count(), 1);
        assert!(stdout.contains("Sanitized: SELECT * FROM users WHERE username = admin "));
        assert!(stdout.contains("Sanitized: Hello, world!"));
        assert!(stdout.contains("Sanitized: DROP TABLE users"));
        assert!(stdout.contains("Sanitized: name=Johnemail=john@example.com"));
    }
}

// ============================================================================
// signatures
// ============================================================================

mod signatures_tests {
    use super::*;

    #[test]
    fn lists_the_signature_table() {
        let output = run_sig(&["signatures"]);
        assert!(output.status.success());
        let stdout = stdout_str(&output);
        assert!(stdout.contains("9 signatures:"));
        assert!(stdout.contains("single-quote"));
        assert!(stdout.contains("keyword-union"));
    }

    #[test]
    fn verbose_includes_patterns() {
        let output = run_sig(&["signatures", "--verbose"]);
        let stdout = stdout_str(&output);
        assert!(stdout.contains(r"(?i)\bselect\b"));
    }
}

// ============================================================================
// init / config
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn init_prints_sample_to_stdout() {
        let output = run_sig(&["init"]);
        assert!(output.status.success());
        let stdout = stdout_str(&output);
        assert!(stdout.contains("[general]"));
        assert!(stdout.contains("[logging]"));
    }

    #[test]
    fn init_refuses_existing_file_without_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "existing").expect("write");
        let path_str = path.to_str().expect("utf-8 path");

        let output = run_sig(&["init", "--output", path_str]);
        assert_eq!(output.status.code(), Some(1));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "existing");

        let output = run_sig(&["init", "--output", path_str, "--force"]);
        assert!(output.status.success());
        assert!(std::fs::read_to_string(&path)
            .expect("read")
            .contains("[general]"));
    }

    #[test]
    fn config_shows_effective_toml() {
        let output = run_sig(&["config"]);
        assert!(output.status.success());
        let stdout = stdout_str(&output);
        assert!(stdout.contains("[general]"));
        assert!(stdout.contains("color = \"auto\""));
    }

    #[test]
    fn unknown_subcommand_exits_two() {
        let output = run_sig(&["no-such-command"]);
        assert_eq!(output.status.code(), Some(2));
    }
}

// ============================================================================
// filter mode (stdin)
// ============================================================================

mod filter_mode_tests {
    use super::*;

    #[test]
    fn analyzes_each_stdin_line() {
        let output = run_sig_with_env(&[], &[], Some("DROP TABLE users;\nHello, world!\n"));
        assert!(output.status.success());
        let stdout = stdout_str(&output);
        assert!(stdout.contains("Warning: possible SQL injection detected!"));
        assert!(stdout.contains("Input is clean."));
        assert!(stdout.contains("Sanitized: DROP TABLE users"));
        assert!(stdout.contains("Sanitized: Hello, world!"));
    }

    #[test]
    fn empty_stdin_exits_zero() {
        let output = run_sig_with_env(&[], &[], Some(""));
        assert!(output.status.success());
        assert_eq!(stdout_str(&output), "");
    }
}

// ============================================================================
// decision logging
// ============================================================================

mod logging_tests {
    use super::*;

    #[test]
    fn env_configured_log_captures_suspicious_verdicts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log_path = temp.path().join("decisions.log");
        let log_str = log_path.to_str().expect("utf-8 path");

        let output = run_sig_with_env(
            &["analyze", "DROP TABLE users;"],
            &[("SIG_LOG_FILE", log_str), ("SIG_LOG_FORMAT", "json")],
            None,
        );
        assert!(output.status.success());

        let contents = std::fs::read_to_string(&log_path).expect("log file written");
        let line = contents.lines().next().expect("one entry");
        let parsed: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
        assert_eq!(parsed["verdict"], "suspicious");
        assert_eq!(parsed["input"], "DROP TABLE users;");
        assert_eq!(parsed["signatures"][0], "keyword-drop");
    }

    #[test]
    fn clean_verdicts_are_not_logged_by_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let log_path = temp.path().join("decisions.log");
        let log_str = log_path.to_str().expect("utf-8 path");

        let output = run_sig_with_env(
            &["analyze", "Hello, world!"],
            &[("SIG_LOG_FILE", log_str)],
            None,
        );
        assert!(output.status.success());

        let contents = std::fs::read_to_string(&log_path).unwrap_or_default();
        assert!(contents.is_empty(), "clean verdicts filtered out by default");
    }
}
