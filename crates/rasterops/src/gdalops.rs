use std::path::Path;

use catalog::params::ResamplingMethod;

use crate::commands;
use crate::georeference::{self, GeoReference};
use crate::operations::{MosaicSpec, RasterOperations, RasterStats, TerrainPaths, WarpSpec};
use crate::{dem, gdalinterop, translate, vrt, warp, Error, Result};

const OVERVIEW_LEVELS: [i32; 4] = [2, 4, 8, 16];

/// GDAL backed implementation of the raster operation contract.
#[derive(Debug, Default)]
pub struct GdalRasterOps {
    /// Creation options applied when an operation does not declare its own.
    default_creation_options: Vec<String>,
}

impl GdalRasterOps {
    pub fn new(default_creation_options: Vec<String>) -> Self {
        GdalRasterOps { default_creation_options }
    }
}

impl RasterOperations for GdalRasterOps {
    fn mosaic(&self, spec: &MosaicSpec, output: &Path) -> Result {
        if spec.inputs.is_empty() {
            return Err(Error::Mosaic("no input rasters".to_string()));
        }

        // All sources must agree on band layout before they are combined.
        let mut expected: Option<(usize, String)> = None;
        for input in &spec.inputs {
            let ds = georeference::open_read_only(input)?;
            let layout = (ds.raster_count(), format!("{:?}", ds.rasterband(1)?.band_type()));
            match &expected {
                None => expected = Some(layout),
                Some(first) if *first != layout => {
                    return Err(Error::Mosaic(format!(
                        "{} has {} band(s) of {}, expected {} band(s) of {}",
                        input.display(),
                        layout.0,
                        layout.1,
                        first.0,
                        first.1,
                    )));
                }
                Some(_) => {}
            }
        }

        let ordered = commands::ordered_inputs(&spec.inputs, spec.policy);
        let scratch = commands::vrt_scratch_path(output);

        log::debug!("Mosaic {} sources -> {}", ordered.len(), output.display());
        let result = vrt::build_vrt(&scratch, &ordered, &commands::vrt_args(spec))
            .and_then(|vrt_ds| translate::translate_to_disk(&vrt_ds, output, &commands::mosaic_translate_args(spec)))
            .map(|_| ())
            .map_err(|err| Error::Mosaic(format!("{}: {err}", output.display())));

        gdalinterop::unlink_virtual_file(&scratch);

        result
    }

    fn warp(&self, input: &Path, output: &Path, spec: &WarpSpec) -> Result {
        let align = match &spec.align_to {
            Some(reference) => Some(GeoReference::from_file(reference)?),
            None => None,
        };

        let args = commands::warp_args(spec, align.as_ref());
        let src = georeference::open_read_only(input)?;

        log::debug!("Warp {} -> {}", input.display(), output.display());
        warp::warp_to_disk(&src, output, &args).map_err(|err| match err {
            Error::InvalidPath(path) => Error::InvalidPath(path),
            err => Error::Reprojection(format!("{}: {err}", input.display())),
        })
    }

    fn resample(&self, input: &Path, output: &Path, target_resolution: f64, method: ResamplingMethod) -> Result {
        let spec = commands::resample_spec(target_resolution, method, None, &self.default_creation_options);
        self.warp(input, output, &spec)
    }

    fn derive_terrain(&self, input: &Path, outputs: &TerrainPaths, creation_options: &[String]) -> Result {
        let creation_options = if creation_options.is_empty() {
            &self.default_creation_options
        } else {
            creation_options
        };

        let src = georeference::open_read_only(input)?;
        for (mode, dest) in [
            ("hillshade", &outputs.hillshade),
            ("slope", &outputs.slope),
            ("aspect", &outputs.aspect),
        ] {
            log::debug!("Derive {mode}: {} -> {}", input.display(), dest.display());
            dem::dem_processing(&src, dest, mode, &commands::dem_args(mode, creation_options))?;
        }

        Ok(())
    }

    fn finalize(&self, raster: &Path) -> Result<RasterStats> {
        let mut ds = georeference::open_update(raster)?;
        ds.build_overviews("AVERAGE", &OVERVIEW_LEVELS, &[])?;

        let band = ds.rasterband(1)?;
        let stats = band
            .get_statistics(true, false)?
            .ok_or_else(|| Error::InvalidArgument(format!("No statistics available for {}", raster.display())))?;

        log::debug!(
            "Finalized {}: value range [{:.2} <-> {:.2}]",
            raster.display(),
            stats.min,
            stats.max
        );

        Ok(RasterStats {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            std_dev: stats.std_dev,
        })
    }
}
