//! Pure construction of the option lists handed to the GDAL utilities.
//!
//! Keeping these as plain functions over the spec types means the exact
//! command contract is unit testable without touching a dataset.

use std::path::{Path, PathBuf};

use catalog::params::{CompositePolicy, ResamplingMethod};

use crate::operations::{MosaicSpec, WarpSpec};
use crate::GeoReference;

/// Option list for a warp invocation.
///
/// `align` is the resolved grid of `spec.align_to`: the output extent is
/// pinned to it and the cell size falls back to its resolution when the spec
/// does not declare one.
pub fn warp_args(spec: &WarpSpec, align: Option<&GeoReference>) -> Vec<String> {
    let mut args: Vec<String> = vec!["-of".into(), "GTiff".into()];

    if let Some(source_crs) = &spec.source_crs {
        args.extend(["-s_srs".into(), source_crs.clone()]);
    }
    if let Some(target_crs) = &spec.target_crs {
        args.extend(["-t_srs".into(), target_crs.clone()]);
    }
    if let Some(resampling) = spec.resampling {
        args.extend(["-r".into(), resampling.to_string()]);
    }

    match align {
        Some(reference) => {
            let extent = reference.extent();
            args.extend([
                "-te".into(),
                extent.min_x.to_string(),
                extent.min_y.to_string(),
                extent.max_x.to_string(),
                extent.max_y.to_string(),
            ]);

            let resolution = spec.target_resolution.unwrap_or_else(|| reference.cell_size().0.abs());
            args.extend(["-tr".into(), resolution.to_string(), resolution.to_string()]);
        }
        None => {
            if let Some(resolution) = spec.target_resolution {
                args.extend(["-tr".into(), resolution.to_string(), resolution.to_string()]);
            }
        }
    }

    if let Some(pixel_type) = spec.pixel_type {
        args.extend(["-ot".into(), pixel_type.type_name().into()]);
    }
    if let Some(nodata) = spec.nodata {
        args.extend(["-dstnodata".into(), nodata.to_string()]);
    }
    if let Some(cutline) = &spec.cutline {
        args.extend(["-cutline".into(), cutline.dataset.to_string_lossy().into_owned()]);
        if let Some(where_clause) = &cutline.where_clause {
            args.extend(["-cwhere".into(), where_clause.clone()]);
        }
        if cutline.crop {
            args.push("-crop_to_cutline".into());
        }
    }
    for option in &spec.creation_options {
        args.extend(["-co".into(), option.clone()]);
    }

    args
}

/// The resample contract is warp restricted to the source coordinate system:
/// no CRS flags, a coarser grid, an aggregating method.
pub fn resample_spec(target_resolution: f64, method: ResamplingMethod, nodata: Option<f64>, creation_options: &[String]) -> WarpSpec {
    WarpSpec {
        target_resolution: Some(target_resolution),
        resampling: Some(method),
        nodata,
        creation_options: creation_options.to_vec(),
        ..Default::default()
    }
}

/// Source order actually handed to the VRT builder, where the later source
/// wins on overlap.
pub fn ordered_inputs(inputs: &[PathBuf], policy: CompositePolicy) -> Vec<PathBuf> {
    match policy {
        CompositePolicy::LastWins => inputs.to_vec(),
        CompositePolicy::FirstWins => inputs.iter().rev().cloned().collect(),
    }
}

/// Option list for the mosaic VRT.
pub fn vrt_args(spec: &MosaicSpec) -> Vec<String> {
    let mut args: Vec<String> = vec!["-resolution".into(), "highest".into()];
    if let Some(nodata) = spec.nodata {
        args.extend(["-vrtnodata".into(), nodata.to_string()]);
    }

    args
}

/// Option list for materializing the mosaic VRT into the output raster.
pub fn mosaic_translate_args(spec: &MosaicSpec) -> Vec<String> {
    let mut args: Vec<String> = vec!["-ot".into(), spec.pixel_type.type_name().into()];
    if let Some(nodata) = spec.nodata {
        args.extend(["-a_nodata".into(), nodata.to_string()]);
    }
    for option in &spec.creation_options {
        args.extend(["-co".into(), option.clone()]);
    }

    args
}

/// Option list for one terrain derivation mode.
///
/// Hillshade uses the standard illumination model parameters (sun azimuth
/// 315, altitude 45).
pub fn dem_args(mode: &str, creation_options: &[String]) -> Vec<String> {
    let mut args: Vec<String> = vec!["-compute_edges".into()];
    if mode == "hillshade" {
        args.extend(["-az".into(), "315".into(), "-alt".into(), "45".into()]);
    }
    for option in creation_options {
        args.extend(["-co".into(), option.clone()]);
    }

    args
}

/// In-memory scratch path for a mosaic VRT, derived from the output name.
pub fn vrt_scratch_path(output: &Path) -> String {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mosaic".to_string());

    format!("/vsimem/{stem}.vrt")
}
