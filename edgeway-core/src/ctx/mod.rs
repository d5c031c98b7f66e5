mod error;
mod request;
mod request_ctx;
mod request_id;
mod response;

pub use error::*;
pub use request::*;
pub use request_ctx::*;
pub use request_id::*;
pub use response::*;
