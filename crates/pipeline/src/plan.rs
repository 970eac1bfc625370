use std::path::PathBuf;

use catalog::{Catalog, Resolution, RunConfig, TerrainProduct};
use tiles::{staged_raster_path, TileRef};

use crate::stage::{StageDescriptor, StageKind};
use crate::{Error, Result};

/// Build the ordered stage sequence of a full run.
///
/// Per sub-region: subset the land cover, mosaic the source tiles, warp onto
/// the land cover grid, aggregate to 30 meter, derive terrain, finalize.
/// Per office: mosaic the member region products, finalize. The returned
/// vector is topologically ordered and `depends_on` indexes into it.
pub fn build_plan(config: &RunConfig, catalog: &Catalog, tiles: &[TileRef]) -> Result<Vec<StageDescriptor>> {
    let regions = config.region_set()?;
    let mut stages: Vec<StageDescriptor> = Vec::new();

    for office in regions.offices() {
        let mut members_10m = Vec::new();
        let mut members_30m = Vec::new();

        for region in &office.regions {
            let nlcd30m = require_path(catalog, "nlcd30m", region)?;
            let ned09d = require_path(catalog, "ned09d", region)?;
            let ned10m = require_path(catalog, "ned10m", region)?;
            let ned30m = require_path(catalog, "ned30m", region)?;

            let tile_inputs: Vec<PathBuf> = tiles
                .iter()
                .filter(|tile| tile.intersects(region))
                .map(|tile| staged_raster_path(&config.staging_dir, Resolution::ArcNinth, tile.id))
                .collect();
            if tile_inputs.is_empty() {
                return Err(Error::Plan(format!("no tiles intersect region {region}")));
            }

            let subset_at = push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::Subset,
                    region: region.clone(),
                    inputs: vec![config.landcover_source.clone()],
                    outputs: vec![nlcd30m.clone()],
                    depends_on: Vec::new(),
                },
            );

            let mosaic_at = push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::MosaicTiles,
                    region: region.clone(),
                    inputs: tile_inputs,
                    outputs: vec![ned09d.clone()],
                    depends_on: Vec::new(),
                },
            );

            let warp_at = push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::Warp,
                    region: region.clone(),
                    // The second input is the alignment reference.
                    inputs: vec![ned09d, nlcd30m],
                    outputs: vec![ned10m.clone()],
                    depends_on: vec![subset_at, mosaic_at],
                },
            );

            let resample_at = push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::Resample,
                    region: region.clone(),
                    inputs: vec![ned10m.clone()],
                    outputs: vec![ned30m.clone()],
                    depends_on: vec![warp_at],
                },
            );

            let elevation_row = catalog
                .row("ned10m", region)
                .ok_or_else(|| Error::Plan(format!("no ned10m row for region {region}")))?;
            push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::Terrain,
                    region: region.clone(),
                    inputs: vec![ned10m.clone()],
                    outputs: vec![
                        elevation_row.terrain_path(TerrainProduct::Hillshade),
                        elevation_row.terrain_path(TerrainProduct::Slope),
                        elevation_row.terrain_path(TerrainProduct::Aspect),
                    ],
                    depends_on: vec![warp_at],
                },
            );

            for (raster, produced_at) in [(&ned10m, warp_at), (&ned30m, resample_at)] {
                push(
                    &mut stages,
                    StageDescriptor {
                        kind: StageKind::Finalize,
                        region: region.clone(),
                        inputs: vec![raster.clone()],
                        outputs: Vec::new(),
                        depends_on: vec![produced_at],
                    },
                );
            }

            members_10m.push((ned10m, warp_at));
            members_30m.push((ned30m, resample_at));
        }

        for (key, members) in [("ned10m", &members_10m), ("ned30m", &members_30m)] {
            let output = require_path(catalog, key, &office.code)?;
            let mosaic_at = push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::OfficeMosaic,
                    region: office.code.clone(),
                    inputs: members.iter().map(|(path, _)| path.clone()).collect(),
                    outputs: vec![output.clone()],
                    depends_on: members.iter().map(|&(_, at)| at).collect(),
                },
            );

            push(
                &mut stages,
                StageDescriptor {
                    kind: StageKind::Finalize,
                    region: office.code.clone(),
                    inputs: vec![output],
                    outputs: Vec::new(),
                    depends_on: vec![mosaic_at],
                },
            );
        }
    }

    log::debug!("Planned {} stages", stages.len());

    Ok(stages)
}

fn push(stages: &mut Vec<StageDescriptor>, stage: StageDescriptor) -> usize {
    stages.push(stage);
    stages.len() - 1
}

fn require_path(catalog: &Catalog, key: &str, region: &str) -> Result<PathBuf> {
    catalog
        .path(key, region)
        .map(|path| path.to_path_buf())
        .ok_or_else(|| Error::Plan(format!("no {key} catalog entry for region {region}")))
}
