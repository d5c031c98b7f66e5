mod bucket;
pub mod server;
pub mod tracing;

pub use server::TestServer;
pub use tracing::{CapturedEvent, init_test_tracing};
