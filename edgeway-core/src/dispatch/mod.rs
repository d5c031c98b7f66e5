mod background;
mod dispatcher;
mod error;
mod headers;
mod settings;
#[cfg(test)]
mod tests;

pub use background::BackgroundWork;
pub use dispatcher::ProxyDispatcher;
pub use error::DispatchError;
pub use settings::{DeliveryMode, DispatcherSettings, redirect_location};
