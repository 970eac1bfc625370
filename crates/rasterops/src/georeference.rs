use std::path::{Path, PathBuf};

use gdal::errors::GdalError;
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};

use crate::{Error, Result};

/// Georeferenced bounding box, projected units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// The grid of a raster on disk: projection, origin, cell size and extent.
///
/// This is all the alignment information the warp stage needs to pin an
/// output onto a reference raster's pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoReference {
    projection: String,
    geo_transform: [f64; 6],
    columns: usize,
    rows: usize,
    nodata: Option<f64>,
}

impl GeoReference {
    pub fn new(projection: String, geo_transform: [f64; 6], columns: usize, rows: usize, nodata: Option<f64>) -> Self {
        GeoReference {
            projection,
            geo_transform,
            columns,
            rows,
            nodata,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let ds = open_read_only(path)?;
        let geo_transform = ds.geo_transform()?;
        let (columns, rows) = ds.raster_size();
        let nodata = ds.rasterband(1)?.no_data_value();

        Ok(GeoReference {
            projection: ds.projection(),
            geo_transform,
            columns,
            rows,
            nodata,
        })
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn geo_transform(&self) -> [f64; 6] {
        self.geo_transform
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.geo_transform[0], self.geo_transform[3])
    }

    /// Cell size as (width, height); height is negative for north-up rasters.
    pub fn cell_size(&self) -> (f64, f64) {
        (self.geo_transform[1], self.geo_transform[5])
    }

    pub fn extent(&self) -> Extent {
        let (origin_x, origin_y) = self.origin();
        let (cell_width, cell_height) = self.cell_size();
        let far_x = origin_x + cell_width * self.columns as f64;
        let far_y = origin_y + cell_height * self.rows as f64;

        Extent {
            min_x: origin_x.min(far_x),
            min_y: origin_y.min(far_y),
            max_x: origin_x.max(far_x),
            max_y: origin_y.max(far_y),
        }
    }
}

/// Open a raster dataset for reading, with a cleaner error when the file does
/// not exist.
pub fn open_read_only(path: &Path) -> Result<Dataset> {
    let options = DatasetOptions {
        open_flags: GdalOpenFlags::GDAL_OF_READONLY | GdalOpenFlags::GDAL_OF_RASTER,
        ..Default::default()
    };

    Dataset::open_ex(path, options).map_err(|err| match err {
        GdalError::NullPointer { method_name: _, msg: _ } if !path.exists() => Error::InvalidPath(PathBuf::from(path)),
        _ => Error::GdalError(err),
    })
}

/// Open a raster dataset for in place updates (overview building).
pub fn open_update(path: &Path) -> Result<Dataset> {
    let options = DatasetOptions {
        open_flags: GdalOpenFlags::GDAL_OF_UPDATE | GdalOpenFlags::GDAL_OF_RASTER,
        ..Default::default()
    };

    Ok(Dataset::open_ex(path, options)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn extent_from_north_up_transform() {
        // 100x50 cells of 30m starting at (1500000, 2000000)
        let georef = GeoReference::new(
            String::new(),
            [1_500_000.0, 30.0, 0.0, 2_000_000.0, 0.0, -30.0],
            100,
            50,
            None,
        );

        let extent = georef.extent();
        assert_relative_eq!(extent.min_x, 1_500_000.0);
        assert_relative_eq!(extent.max_x, 1_503_000.0);
        assert_relative_eq!(extent.max_y, 2_000_000.0);
        assert_relative_eq!(extent.min_y, 1_998_500.0);
        assert_eq!(georef.cell_size(), (30.0, -30.0));
    }
}
