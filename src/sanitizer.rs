//! Character-level input sanitization.
//!
//! [`sanitize`] removes a fixed five-character set from its input. It is
//! unconditional: it neither consults nor influences the detector, and the
//! two may be called in either order on the same original input.
//!
//! The stripped set intentionally differs from the detection criteria:
//! keywords like `DROP` are detected but not stripped, and `"` is stripped
//! but not detected.

use std::borrow::Cow;

/// Characters removed by [`sanitize`], each stripped individually.
pub const STRIPPED_CHARS: [char; 5] = ['\'', '"', ';', '-', '#'];

#[inline]
const fn is_stripped(byte: u8) -> bool {
    matches!(byte, b'\'' | b'"' | b';' | b'-' | b'#')
}

/// Remove every occurrence of `'`, `"`, `;`, `-`, `#` from the input.
///
/// Returns a borrowed view when nothing needs stripping; allocates only
/// otherwise. Idempotent, total over well-formed text, and independent of
/// the detector's verdict.
#[must_use]
pub fn sanitize(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    // All stripped characters are single-byte ASCII, so a byte scan is
    // UTF-8 safe.
    let clean = memchr::memchr3(b'\'', b'"', b';', bytes).is_none()
        && memchr::memchr2(b'-', b'#', bytes).is_none();
    if clean {
        return Cow::Borrowed(input);
    }
    let out: String = input
        .chars()
        .filter(|c| !c.is_ascii() || !is_stripped(*c as u8))
        .collect();
    Cow::Owned(out)
}
