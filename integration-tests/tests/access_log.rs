use integration_tests::harness::TestServer;
use integration_tests::harness::server::events;
use pretty_assertions::assert_eq;
use std::thread;
use std::time::{Duration, Instant};

/// Wait for the access-log event of a request to `raw_path`.
fn access_log_status(raw_path: &str) -> Option<String> {
    let wanted = format!("Some({raw_path:?})");
    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        let found = events()
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.message.as_deref() == Some("request finished"))
            .find(|e| e.field("raw_path") == Some(wanted.as_str()))
            .and_then(|e| e.field("status").map(str::to_owned));

        if found.is_some() || Instant::now() > deadline {
            return found;
        }
        thread::sleep(Duration::from_millis(25));
    }
}

#[test]
fn every_request_is_logged_with_its_status() {
    let srv = TestServer::start("cached");

    srv.put_object("access-log-found.txt", "found");

    srv.get("/access-log-found.txt").send().unwrap();
    srv.get("/access-log-missing.txt").send().unwrap();

    assert_eq!(access_log_status("/access-log-found.txt").as_deref(), Some("200"));
    assert_eq!(
        access_log_status("/access-log-missing.txt").as_deref(),
        Some("404")
    );
}
