//! Taint detection over the signature registry.
//!
//! Two entry points share one semantics:
//!
//! - [`check`] - boolean verdict, short-circuits on the first signature hit.
//! - [`inspect`] - full match list with byte spans, for reporting and logs.
//!
//! Both are pure predicates over the original input: no side effects, no
//! interaction with the sanitizer, safe to call from parallel callers.

use crate::signatures::REGISTRY;

/// Check an input string for injection indicators.
///
/// Evaluates each signature case-insensitively and returns `true` on the
/// first match, `false` once the table is exhausted. The empty string never
/// matches. A null input is unrepresentable here; callers holding optional
/// text should pass the empty string for absence.
///
/// Detection is advisory: callers decide what to do with the verdict, and
/// sanitization neither consults nor alters it.
#[must_use]
pub fn check(input: &str) -> bool {
    REGISTRY.is_match(input)
}

/// One signature hit within an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatch {
    /// Name of the matched signature.
    pub name: &'static str,
    /// What the signature flags.
    pub description: &'static str,
    /// Byte span `(start, end)` of the first occurrence.
    pub span: (usize, usize),
}

/// Detection outcome with per-signature attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether any signature matched.
    pub suspicious: bool,
    /// Every matched signature, in table order.
    pub matches: Vec<SignatureMatch>,
}

impl Verdict {
    /// A verdict with no matches.
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            suspicious: false,
            matches: Vec::new(),
        }
    }

    /// Names of the matched signatures, in table order.
    #[must_use]
    pub fn signature_names(&self) -> Vec<&'static str> {
        self.matches.iter().map(|m| m.name).collect()
    }

    /// The first matched signature, if any.
    #[must_use]
    pub fn first(&self) -> Option<&SignatureMatch> {
        self.matches.first()
    }
}

/// Inspect an input string, collecting every signature hit.
///
/// Agrees with [`check`] on the boolean for all inputs, but evaluates the
/// whole table instead of short-circuiting.
#[must_use]
pub fn inspect(input: &str) -> Verdict {
    if !REGISTRY.might_match(input) {
        return Verdict::clean();
    }
    let matches: Vec<SignatureMatch> = REGISTRY
        .entries()
        .iter()
        .filter_map(|sig| {
            sig.regex.find(input).map(|span| SignatureMatch {
                name: sig.name,
                description: sig.description,
                span,
            })
        })
        .collect();
    Verdict {
        suspicious: !matches.is_empty(),
        matches,
    }
}
