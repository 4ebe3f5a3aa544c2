#![cfg_attr(not(test), forbid(unsafe_code))]
//! SQL injection guard (sig) library.
//!
//! Lexical taint detection and sanitization for untrusted text. Two core
//! operations compose linearly and independently:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Signature Registry                       │
//! │   static table → quick reject (Aho-Corasick) → RegexSet  │
//! └──────────────────────────────────────────────────────────┘
//!            │                                   │
//!            ▼                                   ▼
//! ┌─────────────────────┐            ┌─────────────────────┐
//! │      Detector        │            │      Sanitizer       │
//! │  check / inspect     │            │  strip ' " ; - #     │
//! └─────────────────────┘            └─────────────────────┘
//!            │                                   │
//!            └───────────── both consume ────────┘
//!                       the original input
//! ```
//!
//! Detection is advisory (detect-and-log, never detect-and-block), and
//! sanitization runs unconditionally; neither consults the other. Both are
//! stateless total functions over `&str`, safe for concurrent callers.
//!
//! # Usage
//!
//! ```
//! use sql_injection_guard::{check, inspect, sanitize};
//!
//! let input = "SELECT * FROM users WHERE username = 'admin' --";
//! assert!(check(input));
//! assert_eq!(
//!     inspect(input).signature_names(),
//!     ["single-quote", "double-hyphen-comment", "keyword-select"],
//! );
//! assert_eq!(
//!     sanitize(input),
//!     "SELECT * FROM users WHERE username = admin ",
//! );
//! ```

pub mod cli;
pub mod config;
pub mod detector;
pub mod logging;
pub mod sanitizer;
pub mod signatures;

// Re-export commonly used types
pub use config::Config;
pub use detector::{check, inspect, SignatureMatch, Verdict};
pub use logging::{DecisionLogger, LogEntry, LogEventFilter, LogFormat, LoggingConfig};
pub use sanitizer::{sanitize, STRIPPED_CHARS};
pub use signatures::{
    verify_signatures, LazyRegex, Signature, SignatureError, SignatureSet, REGISTRY, SIGNATURES,
};
