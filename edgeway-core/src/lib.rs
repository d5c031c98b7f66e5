pub mod cache;
pub mod canonical;
pub mod cli;
pub mod conf;
pub mod ctx;
pub mod dispatch;
pub mod logging;
mod proxy;
pub mod resolve;
pub mod server;
pub mod store;
