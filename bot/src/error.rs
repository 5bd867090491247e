use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid retention format: {0:?}")]
    InvalidFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Telegram request error: {0}")]
    Request(#[from] teloxide::RequestError),
}

pub type Result<T> = std::result::Result<T, Error>;
