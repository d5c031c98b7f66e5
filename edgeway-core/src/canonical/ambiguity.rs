/// Reports whether a raw path may have been percent-encoded twice.
///
/// The only signal that a second decode pass can still change meaning is an
/// encoded percent sign that itself introduces an escape: `%25` followed by
/// two hex digits. False negatives only mean the double-decoded candidate is
/// never tried; false positives cost one extra store probe.
pub fn is_ambiguous(raw: &str) -> bool {
    raw.as_bytes().windows(5).any(|w| {
        w[0] == b'%' && w[1] == b'2' && w[2] == b'5' && w[3].is_ascii_hexdigit() && w[4].is_ascii_hexdigit()
    })
}
