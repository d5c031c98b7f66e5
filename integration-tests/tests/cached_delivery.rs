use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, LAST_MODIFIED};

#[test]
fn serves_object_from_bucket() {
    let srv = TestServer::start("cached");

    let res = srv.get("/hello.txt").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(res.headers()[CACHE_CONTROL], "s-maxage=3600");
    assert!(res.headers().contains_key(ETAG));
    assert!(res.headers().contains_key(LAST_MODIFIED));
    assert_eq!(res.text().unwrap(), "hello from edgeway\n");
}

#[test]
fn encoded_space_is_served() {
    let srv = TestServer::start("cached");

    let res = srv.get("/a%20b.txt").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().unwrap(), "a file with a space\n");
}

#[test]
fn double_encoded_space_falls_back_to_decoded_object() {
    let srv = TestServer::start("cached");

    let res = srv.get("/dir/a%2520b.txt").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().unwrap(), "nested with a space\n");
}

#[test]
fn literal_percent_object_takes_precedence() {
    let srv = TestServer::start("cached");

    let res = srv.get("/pct%2520name.txt").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().unwrap(), "literal percent name\n");
}

#[test]
fn sidecar_metadata_is_replayed() {
    let srv = TestServer::start("cached");

    let res = srv.get("/docs/readme.md").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/markdown; charset=utf-8");
    assert_eq!(res.headers()[CACHE_CONTROL], "public, max-age=86400");
}

#[test]
fn sidecar_file_is_not_served_as_an_object() {
    let srv = TestServer::start("cached");

    let res = srv.get("/docs/readme.md.meta.json").send().unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[test]
fn repeated_request_is_served_from_cache() {
    // Arrange
    let srv = TestServer::start("cached");
    let first = srv.get("/hello.txt").send().unwrap().text().unwrap();

    // Act
    srv.put_object("hello.txt", "changed underneath");
    let second = srv.get("/hello.txt").send().unwrap().text().unwrap();

    // Assert
    assert_eq!(first, second);
}

#[test]
fn head_returns_headers_without_body() {
    let srv = TestServer::start("cached");

    let res = srv.head("/hello.txt").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(res.bytes().unwrap().len(), 0);
}

#[test]
fn traversal_attempt_is_not_found() {
    let srv = TestServer::start("cached");

    let res = srv.get("/dir/%2e%2e/%2e%2e/Cargo.toml").send().unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
