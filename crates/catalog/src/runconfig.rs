use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::params::{CompositePolicy, PixelType, ResamplingMethod};
use crate::{Catalog, Error, Office, Product, RegionSet, Resolution, Result, SuffixRules};

/// Tile index layer: polygon features with the corner coordinates of each
/// source elevation cell.
#[derive(Debug, Clone, Deserialize)]
pub struct TileIndexLayer {
    pub path: PathBuf,
    #[serde(default = "default_lat_field")]
    pub lat_field: String,
    #[serde(default = "default_lon_field")]
    pub lon_field: String,
}

/// Region boundary layer: one polygon feature per sub-region.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundaryLayer {
    pub path: PathBuf,
    #[serde(default = "default_region_field")]
    pub region_field: String,
}

/// Resampling methods per data class, declared once for the whole run.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ResamplingPolicy {
    /// Continuous data (elevation) during reprojection.
    pub continuous: ResamplingMethod,
    /// Fine to coarse aggregation.
    pub aggregate: ResamplingMethod,
    /// Categorical data (land cover classes).
    pub categorical: ResamplingMethod,
}

impl Default for ResamplingPolicy {
    fn default() -> Self {
        ResamplingPolicy {
            continuous: ResamplingMethod::Bilinear,
            aggregate: ResamplingMethod::Average,
            categorical: ResamplingMethod::NearestNeighbour,
        }
    }
}

/// Immutable parameters of one processing run.
///
/// Loaded once at startup and passed by reference everywhere; nothing in here
/// is mutated while the pipeline runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Root of the output tree; every catalog path lives below this.
    pub data_root: PathBuf,
    /// Where tile archives are downloaded and extracted.
    pub staging_dir: PathBuf,
    /// Coordinate system of the source tiles and index layers (e.g. `EPSG:4269`).
    pub geographic_crs: String,
    /// Target coordinate system of all projected outputs (e.g. `EPSG:5070`).
    pub projected_crs: String,
    /// Epoch label of the land cover product, used as its file name suffix.
    pub landcover_epoch: String,
    /// The national land cover raster that gets subset per region.
    pub landcover_source: PathBuf,
    pub tile_index: TileIndexLayer,
    pub region_boundaries: BoundaryLayer,
    pub offices: Vec<Office>,
    #[serde(default)]
    pub resampling: ResamplingPolicy,
    #[serde(default)]
    pub composite: CompositePolicy,
    #[serde(default = "default_nodata")]
    pub nodata: f64,
    #[serde(default = "default_elevation_pixel_type")]
    pub elevation_pixel_type: PixelType,
    #[serde(default = "default_landcover_pixel_type")]
    pub landcover_pixel_type: PixelType,
    #[serde(default = "default_creation_options")]
    pub creation_options: Vec<String>,
}

fn default_lat_field() -> String {
    "LAT".to_string()
}

fn default_lon_field() -> String {
    "LON".to_string()
}

fn default_region_field() -> String {
    "REGION".to_string()
}

fn default_nodata() -> f64 {
    -9999.0
}

fn default_elevation_pixel_type() -> PixelType {
    PixelType::Float32
}

fn default_landcover_pixel_type() -> PixelType {
    PixelType::Byte
}

fn default_creation_options() -> Vec<String> {
    vec![
        "TILED=YES".to_string(),
        "COMPRESS=LZW".to_string(),
        "BIGTIFF=YES".to_string(),
    ]
}

impl RunConfig {
    pub fn validate(&self) -> Result {
        if self.offices.is_empty() {
            return Err(Error::InvalidConfiguration("no offices configured".to_string()));
        }
        if self.landcover_epoch.is_empty() {
            return Err(Error::InvalidConfiguration("land cover epoch label is empty".to_string()));
        }

        self.region_set().map(|_| ())
    }

    pub fn region_set(&self) -> Result<RegionSet> {
        RegionSet::new(self.offices.clone())
    }

    pub fn suffix_rules(&self) -> SuffixRules {
        SuffixRules {
            landcover_epoch: self.landcover_epoch.clone(),
        }
    }

    /// The four products every run produces.
    pub fn products(&self) -> Vec<Product> {
        vec![
            Product::elevation(Resolution::ArcNinth),
            Product::elevation(Resolution::TenMeter),
            Product::elevation(Resolution::ThirtyMeter),
            Product::land_cover(),
        ]
    }

    /// Build the full catalog for this run: every product crossed with every
    /// sub-region and office code.
    pub fn catalog(&self) -> Result<Catalog> {
        let regions = self.region_set()?;
        Catalog::build(
            &self.products(),
            &regions.all_codes(),
            self.data_root(),
            &self.suffix_rules(),
            &regions,
        )
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig {
            data_root: PathBuf::from("/data"),
            staging_dir: PathBuf::from("/data/staging"),
            geographic_crs: "EPSG:4269".to_string(),
            projected_crs: "EPSG:5070".to_string(),
            landcover_epoch: "2016".to_string(),
            landcover_source: PathBuf::from("/data/nlcd/nlcd_2016.img"),
            tile_index: TileIndexLayer {
                path: PathBuf::from("/data/index/ned_tiles.shp"),
                lat_field: default_lat_field(),
                lon_field: default_lon_field(),
            },
            region_boundaries: BoundaryLayer {
                path: PathBuf::from("/data/index/regions.shp"),
                region_field: default_region_field(),
            },
            offices: vec![Office {
                code: "11".to_string(),
                regions: vec!["11-JUE".to_string()],
            }],
            resampling: ResamplingPolicy::default(),
            composite: CompositePolicy::default(),
            nodata: default_nodata(),
            elevation_pixel_type: default_elevation_pixel_type(),
            landcover_pixel_type: default_landcover_pixel_type(),
            creation_options: default_creation_options(),
        }
    }

    #[test]
    fn catalog_covers_regions_and_offices() -> Result {
        let catalog = config().catalog()?;
        // 4 products x (1 sub-region + 1 office)
        assert_eq!(catalog.rows().len(), 8);
        assert!(catalog.path("ned10m", "11").is_some());
        assert!(catalog.path("ned10m", "11-JUE").is_some());
        Ok(())
    }

    #[test]
    fn validate_rejects_empty_offices() {
        let mut config = config();
        config.offices.clear();
        assert!(config.validate().is_err());
    }
}
