//! Volatile-field normalization for serialized parse trees.
//!
//! Two independently produced trees for the same statement differ in the
//! byte/line positions recorded on their nodes. Before comparing trees the
//! harness removes every `"<key>":<integer>` member for a fixed set of
//! volatile keys. The transform is textual on purpose: the serialized tree
//! is an opaque blob at this boundary, and decoding it just to drop a few
//! numeric fields would couple the harness to the engine's encoding.

/// Field names whose integer values are positional, not semantic.
pub const VOLATILE_KEYS: &[&str] = &["location", "name_location", "line", "column"];

/// Remove every `"<key>":<integer>` member from a serialized tree.
///
/// The integer may carry a leading minus sign. A preceding comma is
/// absorbed with the member; when the member was first in its object the
/// trailing comma is absorbed instead, so the remainder stays well-formed
/// JSON in all three member positions (first, middle, last/only). A match
/// whose value is not an integer is left untouched.
pub fn remove_numeric_key(input: &str, key: &str) -> String {
    let needle = format!("\"{key}\":");
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(&needle) {
        let bytes = rest.as_bytes();
        let mut end = pos + needle.len();
        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        let digits_start = end;
        while matches!(bytes.get(end), Some(b'0'..=b'9')) {
            end += 1;
        }
        if end == digits_start {
            // Key-shaped text without an integer value; keep it.
            let keep = pos + needle.len();
            out.push_str(&rest[..keep]);
            rest = &rest[keep..];
            continue;
        }

        let mut start = pos;
        if start > 0 && bytes[start - 1] == b',' {
            start -= 1;
        } else if bytes.get(end) == Some(&b',') {
            end += 1;
        }
        out.push_str(&rest[..start]);
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Strip all volatile location members from a serialized tree.
///
/// Applies [`remove_numeric_key`] once per key in [`VOLATILE_KEYS`], each
/// pass removing every occurrence of that key before the next key is
/// considered. Callers must apply this to both trees being compared, or to
/// neither.
pub fn strip_locations(tree: &str) -> String {
    let mut out = remove_numeric_key(tree, VOLATILE_KEYS[0]);
    for key in &VOLATILE_KEYS[1..] {
        out = remove_numeric_key(&out, key);
    }
    out
}
