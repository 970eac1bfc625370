use std::collections::BTreeSet;
use std::path::Path;

use catalog::params::CompositePolicy;
use catalog::{BoundaryLayer, Office, ResamplingPolicy, RunConfig, TileIndexLayer};
use tiles::{TileId, TileRef};

/// Single office, single region configuration rooted under `root`.
pub fn run_config(root: &Path) -> RunConfig {
    RunConfig {
        data_root: root.join("out"),
        staging_dir: root.join("staging"),
        geographic_crs: "EPSG:4269".to_string(),
        projected_crs: "EPSG:5070".to_string(),
        landcover_epoch: "2016".to_string(),
        landcover_source: root.join("nlcd").join("nlcd_2016.img"),
        tile_index: TileIndexLayer {
            path: root.join("index").join("ned_tiles.shp"),
            lat_field: "LAT".to_string(),
            lon_field: "LON".to_string(),
        },
        region_boundaries: BoundaryLayer {
            path: root.join("index").join("regions.shp"),
            region_field: "REGION".to_string(),
        },
        offices: vec![Office {
            code: "11".to_string(),
            regions: vec!["11-JUE".to_string()],
        }],
        resampling: ResamplingPolicy::default(),
        composite: CompositePolicy::default(),
        nodata: -9999.0,
        elevation_pixel_type: catalog::params::PixelType::Float32,
        landcover_pixel_type: catalog::params::PixelType::Byte,
        creation_options: vec!["TILED=YES".to_string(), "COMPRESS=LZW".to_string()],
    }
}

/// The three tiles of the reference scenario, all intersecting `11-JUE`.
pub fn tile_refs() -> Vec<TileRef> {
    let regions: BTreeSet<String> = ["11-JUE".to_string()].into();
    [(34, -84), (34, -83), (35, -83)]
        .into_iter()
        .map(|(lat, lon)| TileRef {
            id: TileId::new(lat, lon).expect("valid tile corner"),
            regions: regions.clone(),
        })
        .collect()
}
