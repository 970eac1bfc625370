use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

/// The fixed vocabulary of pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum StageKind {
    /// Crop the land cover raster to the region boundary, reprojected.
    Subset,
    /// Combine the region's source tiles into one geographic raster.
    MosaicTiles,
    /// Reproject the tile mosaic onto the land cover grid at 10 meter.
    Warp,
    /// Aggregate the 10 meter product to 30 meter.
    Resample,
    /// Hillshade, slope and aspect from the 10 meter product.
    Terrain,
    /// Roll sub-region products up into the office raster.
    OfficeMosaic,
    /// Overview pyramids and band statistics, in place.
    Finalize,
}

/// One executable step: named inputs, named outputs, position of the stages
/// it depends on within the plan.
///
/// The plan is already ordered so dependencies always precede dependents; a
/// driver can execute front to back.
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    pub kind: StageKind,
    pub region: String,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub depends_on: Vec<usize>,
}

impl StageDescriptor {
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.region)
    }

    /// Stages without outputs (in place finalization) are always re-run.
    pub fn outputs_exist(&self) -> bool {
        !self.outputs.is_empty() && self.outputs.iter().all(|path| path.exists())
    }

    pub fn primary_path(&self) -> &Path {
        self.inputs
            .first()
            .or_else(|| self.outputs.first())
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(StageKind::Subset.to_string(), "subset");
        assert_eq!(StageKind::MosaicTiles.to_string(), "mosaic-tiles");
        assert_eq!(StageKind::OfficeMosaic.to_string(), "office-mosaic");
        assert_eq!("warp".parse::<StageKind>().ok(), Some(StageKind::Warp));
    }

    #[test]
    fn kinds_ordered_by_pipeline_position() {
        assert!(StageKind::Subset < StageKind::MosaicTiles);
        assert!(StageKind::Warp < StageKind::Resample);
        assert!(StageKind::OfficeMosaic < StageKind::Finalize);
    }
}
