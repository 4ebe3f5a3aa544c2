//! Signature registry for SQL-injection indicators.
//!
//! The registry is a static table of lazily compiled patterns. Matching is
//! two-phase:
//!
//! 1. **Quick reject** - an ASCII-case-insensitive Aho-Corasick scan over the
//!    literal keywords every signature implies. Inputs with no keyword skip
//!    regex evaluation entirely.
//! 2. **Confirm** - a `RegexSet` single-pass check (boolean verdict), or
//!    per-signature evaluation when attribution is needed.
//!
//! The quick-reject keyword list must stay a superset of the signature
//! semantics: any input a signature matches must contain at least one
//! keyword. `quick_reject_is_superset` in the test module enforces this.

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexSet};
use std::sync::{LazyLock, OnceLock};

/// A regex pattern compiled on first use.
///
/// Construction is `const` and performs no compilation, so the signature
/// table can live in a plain static. Compilation happens once, on the first
/// match attempt, behind a `OnceLock`.
#[derive(Debug)]
pub struct LazyRegex {
    pattern: &'static str,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl LazyRegex {
    /// Create a lazy pattern from a static string. No compilation happens here.
    #[must_use]
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            compiled: OnceLock::new(),
        }
    }

    fn get(&self) -> Result<&Regex, &regex::Error> {
        self.compiled
            .get_or_init(|| Regex::new(self.pattern))
            .as_ref()
    }

    /// Check if the pattern matches the haystack.
    ///
    /// Returns `false` if the pattern fails to compile; startup calls
    /// [`verify_signatures`] so a compile failure never goes unnoticed.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.get().map(|re| re.is_match(haystack)).unwrap_or(false)
    }

    /// Byte span `(start, end)` of the first match, if any.
    #[must_use]
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        self.get()
            .ok()
            .and_then(|re| re.find(haystack))
            .map(|m| (m.start(), m.end()))
    }

    /// The pattern string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.pattern
    }

    /// Whether the pattern has been compiled yet.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        matches!(self.compiled.get(), Some(Ok(_)))
    }
}

/// One indicator of injection intent.
pub struct Signature {
    /// Stable identifier, used in logs and CLI output.
    pub name: &'static str,
    /// Human-readable explanation of what the signature flags.
    pub description: &'static str,
    /// Lazily compiled pattern.
    pub regex: LazyRegex,
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

/// Declare a signature without compiling its pattern.
#[macro_export]
macro_rules! signature {
    ($name:literal, $re:literal, $description:literal) => {
        $crate::signatures::Signature {
            name: $name,
            description: $description,
            regex: $crate::signatures::LazyRegex::new($re),
        }
    };
}

/// The built-in signature table.
///
/// Keyword signatures are whole-word and case-insensitive; `SELECTION` does
/// not trigger `keyword-select`.
pub static SIGNATURES: [Signature; 9] = [
    signature!("single-quote", r"'", "single quote string delimiter"),
    signature!("double-hyphen-comment", r"--", "SQL line comment marker"),
    signature!("hash-comment", r"#", "MySQL-style comment marker"),
    signature!("keyword-select", r"(?i)\bselect\b", "SELECT keyword"),
    signature!("keyword-insert", r"(?i)\binsert\b", "INSERT keyword"),
    signature!("keyword-update", r"(?i)\bupdate\b", "UPDATE keyword"),
    signature!("keyword-delete", r"(?i)\bdelete\b", "DELETE keyword"),
    signature!("keyword-drop", r"(?i)\bdrop\b", "DROP keyword"),
    signature!("keyword-union", r"(?i)\bunion\b", "UNION keyword"),
];

/// Literal substrings implied by the signatures, matched ASCII
/// case-insensitively. Used only for quick rejection.
const QUICK_REJECT_KEYWORDS: &[&str] = &[
    "'", "--", "#", "select", "insert", "update", "delete", "drop", "union",
];

/// Error raised when the signature table fails to initialize.
#[derive(Debug)]
pub enum SignatureError {
    /// A signature pattern failed to compile.
    Compile {
        name: &'static str,
        error: regex::Error,
    },
    /// The quick-reject keyword automaton failed to build.
    KeywordAutomaton(aho_corasick::BuildError),
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compile { name, error } => {
                write!(f, "signature '{name}' failed to compile: {error}")
            }
            Self::KeywordAutomaton(e) => {
                write!(f, "keyword automaton failed to build: {e}")
            }
        }
    }
}

impl std::error::Error for SignatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile { error, .. } => Some(error),
            Self::KeywordAutomaton(e) => Some(e),
        }
    }
}

impl From<aho_corasick::BuildError> for SignatureError {
    fn from(e: aho_corasick::BuildError) -> Self {
        Self::KeywordAutomaton(e)
    }
}

/// The signature table plus its precomputed matchers.
pub struct SignatureSet {
    entries: &'static [Signature],
    /// ASCII-case-insensitive keyword automaton. `None` if the build failed;
    /// matching then skips quick rejection (fail-open).
    keyword_matcher: Option<AhoCorasick>,
    /// Single-pass boolean matcher over all signature patterns. `None` if
    /// compilation failed; matching then falls back to per-signature checks.
    boolean_set: Option<RegexSet>,
}

impl SignatureSet {
    fn new(entries: &'static [Signature]) -> Self {
        let keyword_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(QUICK_REJECT_KEYWORDS)
            .ok();
        let boolean_set = RegexSet::new(entries.iter().map(|s| s.regex.as_str())).ok();
        Self {
            entries,
            keyword_matcher,
            boolean_set,
        }
    }

    /// All signatures, in evaluation order.
    #[must_use]
    pub fn entries(&self) -> &'static [Signature] {
        self.entries
    }

    /// Number of signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the set holds no signatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Quick rejection: can any signature possibly match this input?
    ///
    /// False means no signature matches. True means signatures must be
    /// evaluated.
    #[must_use]
    pub fn might_match(&self, input: &str) -> bool {
        match &self.keyword_matcher {
            Some(ac) => ac.is_match(input),
            None => true,
        }
    }

    /// Does any signature match this input?
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        if !self.might_match(input) {
            return false;
        }
        match &self.boolean_set {
            Some(set) => set.is_match(input),
            None => self.entries.iter().any(|s| s.regex.is_match(input)),
        }
    }

    /// First matching signature, in table order.
    #[must_use]
    pub fn first_match(&self, input: &str) -> Option<&'static Signature> {
        if !self.might_match(input) {
            return None;
        }
        self.entries.iter().find(|s| s.regex.is_match(input))
    }

    /// Validate the whole set: every pattern compiles and both matchers build.
    ///
    /// # Errors
    ///
    /// Returns the first [`SignatureError`] encountered.
    pub fn verify(&self) -> Result<(), SignatureError> {
        for sig in self.entries {
            if let Err(e) = Regex::new(sig.regex.as_str()) {
                return Err(SignatureError::Compile {
                    name: sig.name,
                    error: e,
                });
            }
        }
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(QUICK_REJECT_KEYWORDS)?;
        Ok(())
    }
}

/// Global signature set (lazily initialized, read-only after init).
pub static REGISTRY: LazyLock<SignatureSet> = LazyLock::new(|| SignatureSet::new(&SIGNATURES));

/// Validate the built-in signature table. Called once at startup; a failure
/// here is a build defect, not a runtime condition.
///
/// # Errors
///
/// Returns the first [`SignatureError`] encountered.
pub fn verify_signatures() -> Result<(), SignatureError> {
    REGISTRY.verify()
}
