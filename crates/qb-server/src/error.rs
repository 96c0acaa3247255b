use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] qb_store::StoreError),
    #[error("form schema error: {0}")]
    Schema(#[from] qb_form::SchemaError),
    #[error("failed to generate CSRF token: {0}")]
    Random(String),
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
