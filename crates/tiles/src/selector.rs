use std::path::{Path, PathBuf};

use catalog::{BoundaryLayer, TileIndexLayer};
use gdal::errors::GdalError;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{FieldValue, Geometry, Layer, LayerAccess};
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};

use crate::tileref::{dedupe_tiles, TileId, TileRef};
use crate::{Error, Result};

/// Open a vector dataset for reading, with a cleaner error when the file
/// does not exist.
fn open_read_only(path: &Path) -> Result<Dataset> {
    let options = DatasetOptions {
        open_flags: GdalOpenFlags::GDAL_OF_READONLY | GdalOpenFlags::GDAL_OF_VECTOR,
        ..Default::default()
    };

    Dataset::open_ex(path, options).map_err(|err| match err {
        GdalError::NullPointer { method_name: _, msg: _ } if !path.exists() => {
            Error::Geometry(format!("layer does not exist: {}", PathBuf::from(path).display()))
        }
        _ => Error::GdalError(err),
    })
}

/// Intersect the tile index with the region boundaries.
///
/// Returns one reference per tile across the whole run, carrying every region
/// whose boundary it intersects, sorted by tile id. Both layers must be in
/// the same coordinate system; no reprojection is attempted here.
pub fn select_tiles(index: &TileIndexLayer, boundaries: &BoundaryLayer) -> Result<Vec<TileRef>> {
    let index_ds = open_read_only(&index.path)?;
    let boundary_ds = open_read_only(&boundaries.path)?;

    let mut index_layer = index_ds.layer(0)?;
    let mut boundary_layer = boundary_ds.layer(0)?;

    check_same_crs(&index_layer, &boundary_layer)?;

    let regions = read_region_geometries(&mut boundary_layer, &boundaries.region_field)?;
    if regions.is_empty() {
        return Err(Error::Geometry(format!(
            "boundary layer {} has no features",
            boundaries.path.display()
        )));
    }

    let lat_index = index_layer.defn().field_index(&index.lat_field)?;
    let lon_index = index_layer.defn().field_index(&index.lon_field)?;

    let mut observations = Vec::new();
    for feature in index_layer.features() {
        let lat = corner_degrees(feature.field(lat_index)?, &index.lat_field)?;
        let lon = corner_degrees(feature.field(lon_index)?, &index.lon_field)?;
        let id = TileId::new(lat, lon)?;

        let geometry = feature
            .geometry()
            .ok_or_else(|| Error::Geometry(format!("tile {id} has no geometry")))?;
        if geometry.is_empty() {
            return Err(Error::Geometry(format!("tile {id} has empty geometry")));
        }

        for (code, region_geometry) in &regions {
            if geometry.intersects(region_geometry) {
                observations.push((id, code.clone()));
            }
        }
    }

    let tiles = dedupe_tiles(observations);
    log::info!("Selected {} unique tiles for {} regions", tiles.len(), regions.len());

    Ok(tiles)
}

fn read_region_geometries(layer: &mut Layer, region_field: &str) -> Result<Vec<(String, Geometry)>> {
    let region_index = layer.defn().field_index(region_field)?;

    let mut regions = Vec::with_capacity(layer.feature_count() as usize);
    for feature in layer.features() {
        let code = match feature.field(region_index)? {
            Some(FieldValue::StringValue(code)) => code,
            other => {
                return Err(Error::Geometry(format!(
                    "region attribute {region_field} is not a string: {other:?}"
                )));
            }
        };

        let geometry = feature
            .geometry()
            .ok_or_else(|| Error::Geometry(format!("region {code} has no geometry")))?;
        if geometry.is_empty() {
            return Err(Error::Geometry(format!("region {code} has empty geometry")));
        }

        regions.push((code, geometry.clone()));
    }

    Ok(regions)
}

fn check_same_crs(index_layer: &Layer, boundary_layer: &Layer) -> Result {
    let index_srs = index_layer
        .spatial_ref()
        .ok_or_else(|| Error::Geometry("tile index layer has no coordinate system".to_string()))?;
    let boundary_srs = boundary_layer
        .spatial_ref()
        .ok_or_else(|| Error::Geometry("boundary layer has no coordinate system".to_string()))?;

    let left = srs_label(&index_srs);
    let right = srs_label(&boundary_srs);
    if left != right {
        return Err(Error::CrsMismatch { left, right });
    }

    Ok(())
}

/// Authority label (`EPSG:4269`) when available, full WKT otherwise.
fn srs_label(srs: &SpatialRef) -> String {
    match (srs.auth_name(), srs.auth_code()) {
        (Ok(name), Ok(code)) => format!("{name}:{code}"),
        _ => srs.to_wkt().unwrap_or_default(),
    }
}

/// Corner attributes come back as whatever the layer stored them as.
fn corner_degrees(value: Option<FieldValue>, field: &str) -> Result<i32> {
    match value {
        Some(FieldValue::IntegerValue(v)) => Ok(v),
        Some(FieldValue::Integer64Value(v)) => Ok(v as i32),
        Some(FieldValue::RealValue(v)) => Ok(v.round() as i32),
        Some(FieldValue::StringValue(v)) => v
            .trim()
            .parse()
            .map_err(|_| Error::Geometry(format!("field {field} is not numeric: {v}"))),
        other => Err(Error::Geometry(format!("field {field} has no usable value: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_value_coercion() {
        assert_eq!(corner_degrees(Some(FieldValue::IntegerValue(34)), "LAT").ok(), Some(34));
        assert_eq!(corner_degrees(Some(FieldValue::RealValue(-84.0)), "LON").ok(), Some(-84));
        assert_eq!(
            corner_degrees(Some(FieldValue::StringValue(" -83 ".to_string())), "LON").ok(),
            Some(-83)
        );
        assert!(corner_degrees(None, "LAT").is_err());
        assert!(corner_degrees(Some(FieldValue::StringValue("abc".to_string())), "LAT").is_err());
    }
}
