use crate::harness::bucket::fixture_bucket;
use crate::harness::{CapturedEvent, init_test_tracing};
use edgeway_core::conf::load_config;
use edgeway_core::server::build_pingora_server;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::redirect::Policy;
use std::fs;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Handle to a running Edgeway test server.
pub struct TestServer {
    base_url: String,
    client: Client,
    bucket: TempDir,
}

impl TestServer {
    /// Start an Edgeway instance from a fixture config directory.
    ///
    /// The listen port is allocated dynamically and the bucket is a private
    /// copy of `fixtures/bucket`, so tests can run in parallel.
    pub fn start(fixture: &str) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let listen_port = free_port();

        let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("config")
            .join(fixture);

        assert!(
            fixture_dir.exists(),
            "fixture config directory does not exist: {:?}",
            fixture_dir
        );

        let mut cfg = load_config(&fixture_dir).expect("failed to load fixture config");

        // Patch config in memory.
        let bucket = fixture_bucket();
        cfg.server.listen = format!("127.0.0.1:{listen_port}");
        cfg.bucket.root = bucket.path().to_path_buf();

        let server = build_pingora_server(&cfg).expect("failed to build edgeway server");

        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");
        wait_for_server(&base_url);

        // Redirects are asserted on, never followed.
        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .redirect(Policy::none())
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            client,
            bucket,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn head(&self, path: &str) -> RequestBuilder {
        self.client.head(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Write an object into this server's bucket.
    pub fn put_object(&self, key: &str, body: &str) -> PathBuf {
        let path = self.bucket.path().join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create object dir");
        }
        fs::write(&path, body).expect("failed to write object");
        path
    }
}

/// Poll until the server accepts connections (or panic).
fn wait_for_server(base_url: &str) {
    let addr = base_url.strip_prefix("http://").unwrap_or(base_url);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", base_url);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

pub fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
