use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Mosaic error: {0}")]
    Mosaic(String),
    #[error("Reprojection error: {0}")]
    Reprojection(String),
    #[error("Invalid path: {0}")]
    InvalidPath(std::path::PathBuf),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid string: {0}")]
    InvalidString(#[from] std::ffi::NulError),
    #[error("GDAL error: {0}")]
    GdalError(#[from] gdal::errors::GdalError),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
