use crate::dispatch::tests::test_helpers::Harness;
use crate::dispatch::redirect_location;
use crate::canonical::canonicalize;
use http::{StatusCode, header};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn redirect_points_at_canonical_path() {
    // Arrange
    let h = Harness::redirect("cdn.example.com");

    // Act
    let response = h.get("/dir/a b.txt").await;

    // Assert
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION),
        Some("https://cdn.example.com/dir/a%20b.txt")
    );
}

#[tokio::test]
async fn redirect_never_touches_the_cache() {
    // Arrange
    let h = Harness::redirect("cdn.example.com");

    // Act
    h.get("/dir/a%20b.txt").await;
    h.get("/dir/a%2520b.txt").await;

    // Assert
    assert_eq!(h.cache.lookups(), 0);
    assert_eq!(h.cache.stores(), 0);
}

#[tokio::test]
async fn unambiguous_redirect_does_not_probe() {
    // Arrange
    let h = Harness::redirect("cdn.example.com");

    // Act
    let response = h.get("/dir/a%20b.txt").await;

    // Assert
    assert_eq!(
        response.header(header::LOCATION),
        Some("https://cdn.example.com/dir/a%20b.txt")
    );
    assert_eq!(h.store.total_calls(), 0);
}

#[tokio::test]
async fn ambiguous_redirect_uses_the_confirmed_candidate() {
    // Arrange
    let h = Harness::redirect("cdn.example.com");
    h.store.insert_bytes("dir/a b.txt", "deep");

    // Act
    let response = h.get("/dir/a%2520b.txt").await;

    // Assert
    assert_eq!(
        response.header(header::LOCATION),
        Some("https://cdn.example.com/dir/a%20b.txt")
    );
}

#[tokio::test]
async fn unresolved_redirect_falls_back_to_single_decode() {
    // Arrange
    let h = Harness::redirect("cdn.example.com");

    // Act
    let response = h.get("/dir/a%2520b.txt").await;

    // Assert
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION),
        Some("https://cdn.example.com/dir/a%2520b.txt")
    );
}

#[tokio::test]
async fn unreachable_store_during_resolution_is_a_500() {
    // Arrange
    let h = Harness::redirect("cdn.example.com");
    h.store.set_unavailable(true);

    // Act
    let response = h.get("/dir/a%2520b.txt").await;

    // Assert
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn explicit_scheme_on_domain_is_kept() {
    let path = canonicalize("/a b", 1);

    assert_eq!(
        redirect_location("http://cdn.internal/", &path),
        "http://cdn.internal/a%20b"
    );
    assert_eq!(redirect_location("cdn.example.com", &path), "https://cdn.example.com/a%20b");
}
