use std::path::{Path, PathBuf};

use strum::{Display, EnumIter, EnumString};

use crate::{Product, Variable};

/// Variable specific file name suffixes.
///
/// Land cover files carry the epoch label of the source product, elevation
/// files carry no suffix.
#[derive(Debug, Clone)]
pub struct SuffixRules {
    pub landcover_epoch: String,
}

impl SuffixRules {
    pub fn suffix(&self, variable: Variable) -> Option<&str> {
        match variable {
            Variable::Elevation => None,
            Variable::LandCover => Some(self.landcover_epoch.as_str()),
        }
    }
}

/// Terrain rasters derived from an elevation product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TerrainProduct {
    Hillshade,
    Slope,
    Aspect,
}

/// One cell of the processing matrix: a (product, region) combination and its
/// canonical output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    product: Product,
    region: String,
    output_path: PathBuf,
}

impl CatalogRow {
    pub fn new(base_dir: &Path, product: Product, region: &str, suffixes: &SuffixRules) -> Self {
        let output_path = output_path(base_dir, &product.key(), region, suffixes.suffix(product.variable()));
        CatalogRow {
            product,
            region: region.to_string(),
            output_path,
        }
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn key(&self) -> String {
        self.product.key()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Output path for a terrain raster derived from this row, using the
    /// suffix slot of the naming template (`ned10m_11-JUE_hillshade.tif`).
    pub fn terrain_path(&self, product: TerrainProduct) -> PathBuf {
        let file_name = format!("{}_{}_{product}.tif", self.key(), self.region);
        self.output_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(file_name)
    }
}

/// The single place the output naming template lives:
/// `<base>/<region>/<key>_<region>[_<suffix>].tif`.
fn output_path(base_dir: &Path, key: &str, region: &str, suffix: Option<&str>) -> PathBuf {
    let file_name = match suffix {
        Some(suffix) => format!("{key}_{region}_{suffix}.tif"),
        None => format!("{key}_{region}.tif"),
    };

    base_dir.join(region).join(file_name)
}

#[cfg(test)]
mod tests {
    use path_macro::path;

    use super::*;
    use crate::Resolution;

    fn suffixes() -> SuffixRules {
        SuffixRules {
            landcover_epoch: "2016".to_string(),
        }
    }

    #[test]
    fn elevation_row_path() {
        let row = CatalogRow::new(
            Path::new("/data"),
            Product::elevation(Resolution::TenMeter),
            "11-JUE",
            &suffixes(),
        );
        assert_eq!(row.output_path(), path!("/data" / "11-JUE" / "ned10m_11-JUE.tif"));
    }

    #[test]
    fn land_cover_row_carries_epoch_suffix() {
        let row = CatalogRow::new(Path::new("/data"), Product::land_cover(), "11-JUE", &suffixes());
        assert_eq!(row.output_path(), path!("/data" / "11-JUE" / "nlcd30m_11-JUE_2016.tif"));
    }

    #[test]
    fn terrain_paths_stay_in_region_directory() {
        let row = CatalogRow::new(
            Path::new("/data"),
            Product::elevation(Resolution::TenMeter),
            "11-JUE",
            &suffixes(),
        );
        assert_eq!(
            row.terrain_path(TerrainProduct::Hillshade),
            path!("/data" / "11-JUE" / "ned10m_11-JUE_hillshade.tif")
        );
        assert_eq!(
            row.terrain_path(TerrainProduct::Aspect),
            path!("/data" / "11-JUE" / "ned10m_11-JUE_aspect.tif")
        );
    }
}
