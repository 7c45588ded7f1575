//! Slash-joined patch paths.
//!
//! Paths are built by plain concatenation: `base + "/" + segment`. The base
//! is whatever prefix the caller chose for the root and is never validated.
//! Segments are copied verbatim unless escaping is requested, in which case
//! `~` and `/` are encoded as in RFC 6901.

use std::borrow::Cow;

/// Segment addressing the slot past the last element of a sequence.
pub const APPEND_SEGMENT: &str = "-";

/// Escapes a path segment: `~` becomes `~0`, `/` becomes `~1`.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains('/') && !segment.contains('~') {
        return Cow::Borrowed(segment);
    }
    // `~` first, otherwise the `~` of `~1` would be escaped again.
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
}

/// Appends one segment to `base`.
pub fn join(base: &str, segment: &str, escape: bool) -> String {
    let segment = if escape {
        escape_segment(segment)
    } else {
        Cow::Borrowed(segment)
    };
    let mut out = String::with_capacity(base.len() + 1 + segment.len());
    out.push_str(base);
    out.push('/');
    out.push_str(&segment);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_concatenates_verbatim() {
        assert_eq!(join("$", "a", false), "$/a");
        assert_eq!(join("/", "a", false), "//a");
        assert_eq!(join("", "a", false), "/a");
        assert_eq!(join("$", "a/b", false), "$/a/b");
        assert_eq!(join("$/list", APPEND_SEGMENT, true), "$/list/-");
    }

    #[test]
    fn join_escapes_on_request() {
        assert_eq!(join("$", "a/b", true), "$/a~1b");
        assert_eq!(join("$", "m~n", true), "$/m~0n");
        assert_eq!(escape_segment("~1"), "~01");
        assert!(matches!(escape_segment("plain"), Cow::Borrowed("plain")));
    }
}
