use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(String),
    #[error("Coordinate system mismatch between layers: {left} <-> {right}")]
    CrsMismatch { left: String, right: String },
    #[error("Download failed for {url}: {reason}")]
    Download { url: String, reason: String },
    #[error("Extraction failed for {archive}: {reason}")]
    Extraction { archive: String, reason: String },
    #[error("Invalid tile identifier: {0}")]
    InvalidTileId(String),
    #[error("GDAL error: {0}")]
    GdalError(#[from] gdal::errors::GdalError),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
