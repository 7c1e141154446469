use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown stop id: {0}")]
    UnknownStop(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
