use http::{HeaderMap, header};
use std::time::Duration;

/// Lifetime of a response in a shared cache, from its `Cache-Control`.
///
/// `s-maxage` wins over `max-age`. `None` means the response must not be
/// stored: `no-store`, `private`, a zero lifetime, or no lifetime at all.
pub fn shared_max_age(headers: &HeaderMap) -> Option<Duration> {
    let mut s_maxage = None;
    let mut max_age = None;

    let directives = headers
        .get_all(header::CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','));

    for directive in directives {
        let directive = directive.trim();
        let (name, value) = match directive.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim().trim_matches('"'))),
            None => (directive, None),
        };

        if name.eq_ignore_ascii_case("no-store") || name.eq_ignore_ascii_case("private") {
            return None;
        }

        let seconds = value.and_then(|v| v.parse::<u64>().ok());
        if name.eq_ignore_ascii_case("s-maxage") {
            s_maxage = s_maxage.or(seconds);
        } else if name.eq_ignore_ascii_case("max-age") {
            max_age = max_age.or(seconds);
        }
    }

    s_maxage
        .or(max_age)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
