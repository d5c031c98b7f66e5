use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RequestRejectError {
    #[error("request has no host")]
    MissingHost,

    #[error("invalid host '{0}'")]
    InvalidHost(String),
}
