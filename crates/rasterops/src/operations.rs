use std::path::{Path, PathBuf};

use catalog::params::{CompositePolicy, PixelType, ResamplingMethod};

use crate::Result;

/// Clip specification for warp operations: a polygon layer, an optional
/// attribute filter selecting one feature, and whether the output extent is
/// shrunk to the clip geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CutlineSpec {
    pub dataset: PathBuf,
    pub where_clause: Option<String>,
    pub crop: bool,
}

/// Declarative description of one warp invocation.
///
/// `source_crs`/`target_crs` left as `None` keep the input's coordinate
/// system, which turns the warp into a plain resample. When `align_to` names
/// a reference raster, the output extent is pinned to that raster's grid and
/// the resolution falls back to the reference cell size unless
/// `target_resolution` overrides it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarpSpec {
    pub source_crs: Option<String>,
    pub target_crs: Option<String>,
    pub target_resolution: Option<f64>,
    pub resampling: Option<ResamplingMethod>,
    pub pixel_type: Option<PixelType>,
    pub nodata: Option<f64>,
    pub creation_options: Vec<String>,
    pub align_to: Option<PathBuf>,
    pub cutline: Option<CutlineSpec>,
}

/// Declarative description of one mosaic invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicSpec {
    /// Source rasters; precedence between overlapping sources is decided by
    /// `policy`.
    pub inputs: Vec<PathBuf>,
    pub pixel_type: PixelType,
    pub nodata: Option<f64>,
    pub creation_options: Vec<String>,
    pub policy: CompositePolicy,
}

/// Output paths of one terrain derivation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainPaths {
    pub hillshade: PathBuf,
    pub slope: PathBuf,
    pub aspect: PathBuf,
}

impl TerrainPaths {
    pub fn all(&self) -> [&Path; 3] {
        [&self.hillshade, &self.slope, &self.aspect]
    }
}

/// Band statistics of a finished raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// The raster operation collaborator consumed by the pipeline stages.
///
/// Implementations must fail fast: any error from the underlying library
/// aborts the operation, and no usable output may be left behind on failure.
/// The pipeline substitutes a recording fake for this trait in its tests.
pub trait RasterOperations {
    /// Combine the ordered inputs into one raster covering their union extent.
    fn mosaic(&self, spec: &MosaicSpec, output: &Path) -> Result;

    /// Reproject/resample `input` into `output` as described by `spec`.
    fn warp(&self, input: &Path, output: &Path, spec: &WarpSpec) -> Result;

    /// Same coordinate system, coarser grid; aggregates with the given method.
    fn resample(&self, input: &Path, output: &Path, target_resolution: f64, method: ResamplingMethod) -> Result;

    /// Compute hillshade, slope and aspect on the input's exact grid.
    fn derive_terrain(&self, input: &Path, outputs: &TerrainPaths, creation_options: &[String]) -> Result;

    /// Build overview pyramids and compute band statistics.
    fn finalize(&self, raster: &Path) -> Result<RasterStats>;
}
