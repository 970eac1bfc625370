use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A stage aborted; carries enough context to resume from that point.
    #[error("Stage {stage} failed for region {region} ({path}): {source}")]
    Stage {
        stage: String,
        region: String,
        path: PathBuf,
        #[source]
        source: rasterops::Error,
    },
    #[error("Missing input for stage {stage} ({region}): {path}")]
    MissingInput {
        stage: String,
        region: String,
        path: PathBuf,
    },
    #[error("Plan error: {0}")]
    Plan(String),
    #[error("Configuration error: {0}")]
    Configuration(#[from] catalog::Error),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}
