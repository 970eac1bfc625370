#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod commands;
mod dem;
mod error;
pub mod gdalinterop;
mod gdalops;
mod georeference;
mod operations;
mod runtimeconfiguration;
mod translate;
mod vrt;
mod warp;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use gdalops::GdalRasterOps;
#[doc(inline)]
pub use georeference::Extent;
#[doc(inline)]
pub use georeference::GeoReference;
#[doc(inline)]
pub use operations::CutlineSpec;
#[doc(inline)]
pub use operations::MosaicSpec;
#[doc(inline)]
pub use operations::RasterOperations;
#[doc(inline)]
pub use operations::RasterStats;
#[doc(inline)]
pub use operations::TerrainPaths;
#[doc(inline)]
pub use operations::WarpSpec;
#[doc(inline)]
pub use runtimeconfiguration::RuntimeConfiguration;
