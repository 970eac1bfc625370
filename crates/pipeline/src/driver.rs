use std::fs;
use std::path::{Path, PathBuf};

use catalog::{Resolution, RunConfig};
use rasterops::{CutlineSpec, MosaicSpec, RasterOperations, TerrainPaths, WarpSpec};

use crate::stage::{StageDescriptor, StageKind};
use crate::{Error, Result};

/// What happened to one stage during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Skipped,
}

/// Sequential executor of a stage plan.
///
/// One stage runs to completion before the next begins. A stage whose
/// outputs all exist is skipped unless `force` is set, which is what makes an
/// interrupted run resumable: re-running picks up at the first incomplete
/// output. Operations write to `.partial.tif` siblings that are renamed onto
/// the final path on success, so a failure never leaves a partial file at a
/// catalog path.
pub struct Driver<'a, R: RasterOperations> {
    ops: &'a R,
    config: &'a RunConfig,
    force: bool,
}

impl<'a, R: RasterOperations> Driver<'a, R> {
    pub fn new(ops: &'a R, config: &'a RunConfig) -> Self {
        Driver { ops, config, force: false }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn run(&self, stages: &[StageDescriptor]) -> Result<Vec<StageOutcome>> {
        self.run_with_progress(stages, |_, _, _| {})
    }

    /// Run all stages in order, reporting each outcome through the callback
    /// as `(index, stage, outcome)`. The first failure aborts the rest.
    pub fn run_with_progress(
        &self,
        stages: &[StageDescriptor],
        mut on_stage: impl FnMut(usize, &StageDescriptor, StageOutcome),
    ) -> Result<Vec<StageOutcome>> {
        let mut outcomes = Vec::with_capacity(stages.len());
        for (index, stage) in stages.iter().enumerate() {
            let outcome = self.run_stage(stage)?;
            on_stage(index, stage, outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    fn run_stage(&self, stage: &StageDescriptor) -> Result<StageOutcome> {
        if !self.force && stage.outputs_exist() {
            log::info!("{}: output exists, skipping", stage.label());
            return Ok(StageOutcome::Skipped);
        }

        for input in &stage.inputs {
            if !input.exists() {
                return Err(Error::MissingInput {
                    stage: stage.kind.to_string(),
                    region: stage.region.clone(),
                    path: input.clone(),
                });
            }
        }

        let temp_outputs: Vec<PathBuf> = stage.outputs.iter().map(|output| temp_output_path(output)).collect();
        for output in &stage.outputs {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        log::info!("{}: running", stage.label());
        let result = self
            .execute(stage, &temp_outputs)
            .and_then(|_| promote_outputs(&temp_outputs, &stage.outputs));

        match result {
            Ok(()) => Ok(StageOutcome::Completed),
            Err(source) => {
                for temp in &temp_outputs {
                    if temp.exists() {
                        let _ = fs::remove_file(temp);
                    }
                }

                Err(Error::Stage {
                    stage: stage.kind.to_string(),
                    region: stage.region.clone(),
                    path: stage.primary_path().to_path_buf(),
                    source,
                })
            }
        }
    }

    fn execute(&self, stage: &StageDescriptor, temp_outputs: &[PathBuf]) -> rasterops::Result {
        let config = self.config;
        match stage.kind {
            StageKind::Subset => {
                let spec = WarpSpec {
                    target_crs: Some(config.projected_crs.clone()),
                    target_resolution: Resolution::ThirtyMeter.pixel_size(),
                    resampling: Some(config.resampling.categorical),
                    pixel_type: Some(config.landcover_pixel_type),
                    creation_options: config.creation_options.clone(),
                    cutline: Some(CutlineSpec {
                        dataset: config.region_boundaries.path.clone(),
                        where_clause: Some(format!(
                            "{} = '{}'",
                            config.region_boundaries.region_field, stage.region
                        )),
                        crop: true,
                    }),
                    ..Default::default()
                };
                self.ops.warp(&stage.inputs[0], &temp_outputs[0], &spec)
            }
            StageKind::MosaicTiles | StageKind::OfficeMosaic => {
                let spec = MosaicSpec {
                    inputs: stage.inputs.clone(),
                    pixel_type: config.elevation_pixel_type,
                    nodata: Some(config.nodata),
                    creation_options: config.creation_options.clone(),
                    policy: config.composite,
                };
                self.ops.mosaic(&spec, &temp_outputs[0])
            }
            StageKind::Warp => {
                let spec = WarpSpec {
                    source_crs: Some(config.geographic_crs.clone()),
                    target_crs: Some(config.projected_crs.clone()),
                    target_resolution: Resolution::TenMeter.pixel_size(),
                    resampling: Some(config.resampling.continuous),
                    pixel_type: Some(config.elevation_pixel_type),
                    nodata: Some(config.nodata),
                    creation_options: config.creation_options.clone(),
                    align_to: Some(stage.inputs[1].clone()),
                    ..Default::default()
                };
                self.ops.warp(&stage.inputs[0], &temp_outputs[0], &spec)
            }
            StageKind::Resample => {
                let resolution = Resolution::ThirtyMeter.pixel_size().unwrap_or(30.0);
                self.ops
                    .resample(&stage.inputs[0], &temp_outputs[0], resolution, config.resampling.aggregate)
            }
            StageKind::Terrain => {
                let outputs = TerrainPaths {
                    hillshade: temp_outputs[0].clone(),
                    slope: temp_outputs[1].clone(),
                    aspect: temp_outputs[2].clone(),
                };
                self.ops.derive_terrain(&stage.inputs[0], &outputs, &config.creation_options)
            }
            StageKind::Finalize => self.ops.finalize(&stage.inputs[0]).map(|stats| {
                log::info!(
                    "{}: value range [{:.2} <-> {:.2}]",
                    stage.label(),
                    stats.min,
                    stats.max
                );
            }),
        }
    }
}

/// Temp sibling the operation writes to before the rename.
fn temp_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    output.with_file_name(format!("{stem}.partial.tif"))
}

fn promote_outputs(temp_outputs: &[PathBuf], outputs: &[PathBuf]) -> rasterops::Result {
    for (temp, output) in temp_outputs.iter().zip(outputs) {
        fs::rename(temp, output)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    use rasterops::{RasterStats, Result as OpsResult};
    use tiles::staged_raster_path;

    use super::*;
    use crate::plan::build_plan;
    use crate::testutils;

    /// Recording fake for the raster collaborator; creates its output files
    /// so the driver's rename step has something to promote.
    #[derive(Default)]
    struct FakeOps {
        calls: RefCell<Vec<String>>,
        fail_on: Option<StageKind>,
    }

    impl FakeOps {
        fn failing_at(kind: StageKind) -> Self {
            FakeOps {
                calls: RefCell::default(),
                fail_on: Some(kind),
            }
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn write_output(&self, output: &Path) -> OpsResult {
            fs::write(output, b"raster")?;
            Ok(())
        }
    }

    impl RasterOperations for FakeOps {
        fn mosaic(&self, spec: &MosaicSpec, output: &Path) -> OpsResult {
            self.record(format!("mosaic({})", spec.inputs.len()));
            self.write_output(output)
        }

        fn warp(&self, _input: &Path, output: &Path, spec: &WarpSpec) -> OpsResult {
            let kind = if spec.cutline.is_some() { "subset" } else { "warp" };
            if self.fail_on == Some(StageKind::Warp) && kind == "warp" {
                return Err(rasterops::Error::Reprojection("unsupported coordinate system".to_string()));
            }
            self.record(format!("{kind}(align={})", spec.align_to.is_some()));
            self.write_output(output)
        }

        fn resample(
            &self,
            _input: &Path,
            output: &Path,
            target_resolution: f64,
            method: catalog::params::ResamplingMethod,
        ) -> OpsResult {
            self.record(format!("resample({target_resolution}, {method})"));
            self.write_output(output)
        }

        fn derive_terrain(&self, _input: &Path, outputs: &TerrainPaths, _creation_options: &[String]) -> OpsResult {
            self.record("terrain".to_string());
            for output in outputs.all() {
                self.write_output(output)?;
            }
            Ok(())
        }

        fn finalize(&self, raster: &Path) -> OpsResult<RasterStats> {
            self.record(format!(
                "finalize({})",
                raster.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
            ));
            Ok(RasterStats {
                min: 0.0,
                max: 1.0,
                mean: 0.5,
                std_dev: 0.1,
            })
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: RunConfig,
        stages: Vec<StageDescriptor>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = testutils::run_config(dir.path());
        let catalog = config.catalog().expect("catalog");
        let stages = build_plan(&config, &catalog, &testutils::tile_refs()).expect("plan");

        // Stage inputs that no stage produces must pre-exist.
        fs::create_dir_all(config.landcover_source.parent().expect("parent")).expect("create dirs");
        fs::write(&config.landcover_source, b"landcover").expect("write landcover");
        for tile in testutils::tile_refs() {
            let staged = staged_raster_path(&config.staging_dir, Resolution::ArcNinth, tile.id);
            fs::create_dir_all(staged.parent().expect("parent")).expect("create dirs");
            fs::write(&staged, b"tile").expect("write tile");
        }

        Fixture {
            _dir: dir,
            config,
            stages,
        }
    }

    #[test]
    fn runs_stages_in_order_and_promotes_outputs() {
        let fixture = fixture();
        let ops = FakeOps::default();
        let outcomes = Driver::new(&ops, &fixture.config)
            .run(&fixture.stages)
            .expect("run succeeds");

        assert!(outcomes.iter().all(|outcome| *outcome == StageOutcome::Completed));
        assert_eq!(
            *ops.calls.borrow(),
            [
                "subset(align=false)",
                "mosaic(3)",
                "warp(align=true)",
                "resample(30, average)",
                "terrain",
                "finalize(ned10m_11-JUE.tif)",
                "finalize(ned30m_11-JUE.tif)",
                "mosaic(1)",
                "finalize(ned10m_11.tif)",
                "mosaic(1)",
                "finalize(ned30m_11.tif)",
            ]
        );

        // Every output sits at its final path, no partials left behind.
        for stage in &fixture.stages {
            for output in &stage.outputs {
                assert!(output.exists(), "missing output {}", output.display());
                assert!(!temp_output_path(output).exists());
            }
        }
    }

    #[test]
    fn existing_outputs_are_skipped_for_resume() {
        let fixture = fixture();
        let ops = FakeOps::default();
        let driver = Driver::new(&ops, &fixture.config);
        driver.run(&fixture.stages).expect("first run");

        let ops_again = FakeOps::default();
        let outcomes = Driver::new(&ops_again, &fixture.config)
            .run(&fixture.stages)
            .expect("second run");

        // Only the in place finalize stages re-run.
        let skipped = outcomes.iter().filter(|o| **o == StageOutcome::Skipped).count();
        assert_eq!(skipped, 7);
        assert!(ops_again.calls.borrow().iter().all(|call| call.starts_with("finalize")));
    }

    #[test]
    fn force_reruns_everything() {
        let fixture = fixture();
        let ops = FakeOps::default();
        Driver::new(&ops, &fixture.config).run(&fixture.stages).expect("first run");

        let ops_again = FakeOps::default();
        let outcomes = Driver::new(&ops_again, &fixture.config)
            .force(true)
            .run(&fixture.stages)
            .expect("forced run");
        assert!(outcomes.iter().all(|outcome| *outcome == StageOutcome::Completed));
    }

    #[test]
    fn failure_aborts_with_stage_context_and_no_partial_output() {
        let fixture = fixture();
        let ops = FakeOps::failing_at(StageKind::Warp);
        let error = Driver::new(&ops, &fixture.config)
            .run(&fixture.stages)
            .expect_err("warp fails");

        match error {
            Error::Stage { stage, region, .. } => {
                assert_eq!(stage, "warp");
                assert_eq!(region, "11-JUE");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Warp output absent, both as final file and as partial.
        let warp_output = &fixture.stages[2].outputs[0];
        assert!(!warp_output.exists());
        assert!(!temp_output_path(warp_output).exists());

        // Earlier stages completed before the abort.
        assert_eq!(ops.calls.borrow().len(), 2);
    }

    #[test]
    fn missing_input_is_reported_before_invocation() {
        let fixture = fixture();
        fs::remove_file(&fixture.config.landcover_source).expect("remove landcover");

        let ops = FakeOps::default();
        let error = Driver::new(&ops, &fixture.config)
            .run(&fixture.stages)
            .expect_err("missing input");

        assert!(matches!(error, Error::MissingInput { ref stage, .. } if stage == "subset"));
        assert!(ops.calls.borrow().is_empty());
    }

    #[test]
    fn temp_paths_are_siblings_of_the_output() {
        assert_eq!(
            temp_output_path(Path::new("/data/11-JUE/ned10m_11-JUE.tif")),
            Path::new("/data/11-JUE/ned10m_11-JUE.partial.tif")
        );
    }

    #[test]
    fn shared_tiles_feed_every_referencing_region() {
        // Sanity check of the fixture invariant the mosaic relies on.
        let tiles = testutils::tile_refs();
        let unique: BTreeSet<_> = tiles.iter().map(|t| t.id).collect();
        assert_eq!(unique.len(), tiles.len());
    }
}
