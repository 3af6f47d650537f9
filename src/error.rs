use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("corrupted graph cache: {0}")]
    CorruptedCache(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
}
