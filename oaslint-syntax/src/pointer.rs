//! RFC 6901 JSON Pointer helpers.
//!
//! Pointers are the primary key space of the IR (see [`crate::ir`]): every
//! node is addressed by the pointer from its document's root, and pointers
//! round-trip through [`split`] and [`join`] without loss.

/// Splits a JSON Pointer into its unescaped segments.
///
/// The empty string denotes the document root and splits to an empty
/// `Vec`. A leading `/` is required for any non-root pointer; pointers
/// missing it are treated as a single opaque segment (callers constructing
/// pointers programmatically should always go through [`join`]).
pub fn split(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }

    pointer
        .split('/')
        .skip(1)
        .map(unescape_segment)
        .collect()
}

/// Joins pointer segments into a single escaped JSON Pointer string.
pub fn join(segments: &[impl AsRef<str>]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&escape_segment(segment.as_ref()));
    }
    out
}

/// Appends one raw (unescaped) segment to a pointer, returning the new
/// pointer string.
pub fn child(parent: &str, segment: &str) -> String {
    let mut out = String::with_capacity(parent.len() + segment.len() + 1);
    out.push_str(parent);
    out.push('/');
    out.push_str(&escape_segment(segment));
    out
}

/// Escapes a single raw segment per RFC 6901 (`~` -> `~0`, `/` -> `~1`).
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains('~') && !segment.contains('/') {
        return segment.to_string();
    }

    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            c => out.push(c),
        }
    }
    out
}

/// Unescapes a single pointer segment (`~1` -> `/`, `~0` -> `~`).
///
/// Per RFC 6901, `~1` must be decoded before `~0` is reinterpreted, so a
/// naive two-pass `replace` would be wrong on a segment like `~01`. This
/// walks the string once instead.
fn unescape_segment(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }

    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(other) => {
                out.push('~');
                out.push(other);
            }
            None => out.push('~'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_well_formed_pointers() {
        for p in ["", "/a", "/a/b", "/components/schemas/Pet", "/a~1b/c~0d"] {
            assert_eq!(join(&split(p)), p, "pointer {p} did not round-trip");
        }
    }

    #[test]
    fn escapes_tilde_before_slash() {
        assert_eq!(escape_segment("~"), "~0");
        assert_eq!(escape_segment("/"), "~1");
        assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
    }

    #[test]
    fn unescape_handles_tilde_one_correctly() {
        // `~01` must decode to `~1`, not `/`.
        assert_eq!(split("/~01"), vec!["~1"]);
    }

    #[test]
    fn child_appends_one_segment() {
        assert_eq!(child("/components/schemas", "Pet"), "/components/schemas/Pet");
        assert_eq!(child("", "paths"), "/paths");
    }
}
