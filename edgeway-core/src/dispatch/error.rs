use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid {name} header value '{value}'")]
    InvalidHeader { name: &'static str, value: String },
}
