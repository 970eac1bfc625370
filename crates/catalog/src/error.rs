use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown region code: {0}")]
    UnknownRegion(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Duplicate catalog entry for path: {0}")]
    DuplicatePath(std::path::PathBuf),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
