/// Content fingerprint used as the entity tag: a truncated BLAKE3 digest.
pub fn fingerprint(body: &[u8]) -> String {
    let hash = blake3::hash(body);
    hash.to_hex().as_str()[..32].to_owned()
}

/// Quote an entity tag for the `ETag` header.
pub fn http_etag(etag: &str) -> String {
    format!("\"{etag}\"")
}
