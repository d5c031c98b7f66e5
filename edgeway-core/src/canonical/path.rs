use crate::canonical::CanonicalPath;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Bytes left as-is when a decoded segment is re-encoded.
///
/// Everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, `/` and `%`
/// included, so a decoded segment always re-encodes to exactly one segment.
pub const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` that is not followed by two hex digits.
    MalformedEscape,
    /// The decoded bytes are not UTF-8.
    InvalidUtf8,
}

/// Canonicalizes a raw request path.
///
/// Each non-empty `/`-delimited segment is percent-decoded up to `passes`
/// times and then re-encoded once. Empty segments are kept, so leading,
/// trailing and repeated slashes survive untouched.
///
/// Decoding never fails the call: when a pass hits a malformed escape or
/// non-UTF-8 bytes, the value from the previous pass is kept.
pub fn canonicalize(raw: &str, passes: u8) -> CanonicalPath {
    let decoded = raw
        .split('/')
        .map(|segment| decode_segment(segment, passes))
        .collect::<Vec<_>>();

    let encoded = decoded
        .iter()
        .map(|segment| encode_segment(segment))
        .collect::<Vec<_>>();

    CanonicalPath::new(encoded.join("/"), decoded.join("/"))
}

/// The canonical, single-encoded form of `raw` after `passes` decodes.
pub fn normalize_path(raw: &str, passes: u8) -> String {
    canonicalize(raw, passes).encoded().to_owned()
}

/// The decoded form of `raw` after `passes` decodes (no re-encode).
pub fn decode_path(raw: &str, passes: u8) -> String {
    canonicalize(raw, passes).decoded().to_owned()
}

pub fn decode_segment(segment: &str, passes: u8) -> String {
    let mut current = segment.to_owned();

    for _ in 0..passes {
        // Nothing left to decode; further passes are no-ops.
        if !current.contains('%') {
            break;
        }

        match decode_once(&current) {
            Ok(next) => current = next,
            Err(_) => break,
        }
    }

    current
}

pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Strict single decode pass.
///
/// `percent_decode_str` passes malformed escapes through verbatim, so they
/// are rejected up front to keep a pass all-or-nothing.
pub fn decode_once(segment: &str) -> Result<String, DecodeError> {
    if !has_well_formed_escapes(segment) {
        return Err(DecodeError::MalformedEscape);
    }

    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}

fn has_well_formed_escapes(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
            _ => return false,
        }
    }

    true
}
