use culture_chat::ChatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("no point of interest with id {0}")]
    UnknownPoint(String),

    #[error("Unsupported URL scheme. Only http:// and https:// are allowed, got: {0}")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Chat(#[from] ChatError),
}
