use std::path::PathBuf;

use catalog::{Resolution, RunConfig};
use clap::{Parser, Subcommand};
use env_logger::{Env, TimestampPrecision};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use pipeline::{build_plan, Driver, StageDescriptor, StageKind};
use rasterops::{GdalRasterOps, RuntimeConfiguration};
use tiles::{select_tiles, HttpTileSource, TileRef, TileSource};

pub type Result<T = ()> = anyhow::Result<T>;

#[derive(Parser, Debug)]
#[clap(name = "nedprep", about = "USGS elevation tile acquisition and processing")]
struct Cli {
    #[arg(long = "config", short = 'c', help = "Run configuration (yaml)")]
    config: PathBuf,

    #[arg(long = "noprogress")]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Print the catalog rows and the stage plan")]
    Plan,
    #[command(name = "select-tiles", about = "Intersect the tile index with the region boundaries")]
    SelectTiles,
    #[command(about = "Download and extract the source elevation tiles")]
    Fetch,
    #[command(about = "Run the processing pipeline")]
    Run {
        #[arg(long = "region", help = "Only run stages of this region or office")]
        region: Option<String>,

        #[arg(
            long = "from-stage",
            value_name = "subset|mosaic-tiles|warp|resample|terrain|office-mosaic|finalize",
            help = "Skip stage kinds that come before this one"
        )]
        from_stage: Option<String>,

        #[arg(long = "force", help = "Re-run stages whose output already exists")]
        force: bool,

        #[arg(long = "dry-run", help = "Print the stages without executing them")]
        dry_run: bool,
    },
}

fn main() -> Result {
    let cli = Cli::parse();

    let logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(Some(TimestampPrecision::Millis))
        .build();

    let multi = MultiProgress::new();
    let level = logger.filter();
    LogWrapper::new(multi.clone(), logger).try_init().expect("Failed to initialize logging");
    log::set_max_level(level);

    let gdal_config = RuntimeConfiguration::builder()
        .config_options(vec![
            ("GDAL_DISABLE_READDIR_ON_OPEN".into(), "YES".into()),
            ("GDAL_PAM_ENABLED".into(), "NO".into()),
        ])
        .build();
    gdal_config.apply()?;

    let config: RunConfig = serde_yaml::from_str(&std::fs::read_to_string(&cli.config)?)?;
    config.validate()?;

    match cli.command {
        Commands::Plan => cmd_plan(&config),
        Commands::SelectTiles => cmd_select_tiles(&config),
        Commands::Fetch => cmd_fetch(&config, &multi, cli.no_progress),
        Commands::Run {
            region,
            from_stage,
            force,
            dry_run,
        } => cmd_run(&config, &multi, cli.no_progress, region, from_stage, force, dry_run),
    }
}

fn selected_tiles(config: &RunConfig) -> Result<Vec<TileRef>> {
    Ok(select_tiles(&config.tile_index, &config.region_boundaries)?)
}

fn cmd_plan(config: &RunConfig) -> Result {
    let catalog = config.catalog()?;
    println!("Catalog ({} rows):", catalog.rows().len());
    for row in catalog.rows() {
        println!("  {:<8} {:<8} {}", row.key(), row.region(), row.output_path().display());
    }

    let tiles = selected_tiles(config)?;
    let plan = build_plan(config, &catalog, &tiles)?;
    println!("Stages ({}):", plan.len());
    for (index, stage) in plan.iter().enumerate() {
        let status = if stage.outputs_exist() { "done" } else { "pending" };
        let output = stage
            .outputs
            .first()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(in place)".to_string());
        println!("  {index:>3} {:<24} [{status:<7}] {output}", stage.label());
    }

    Ok(())
}

fn cmd_select_tiles(config: &RunConfig) -> Result {
    let tiles = selected_tiles(config)?;
    for tile in &tiles {
        let regions = tile.regions.iter().cloned().collect::<Vec<_>>().join(", ");
        println!("{}  ({regions})", tile.id);
    }
    println!("{} unique tiles", tiles.len());

    Ok(())
}

fn cmd_fetch(config: &RunConfig, multi: &MultiProgress, no_progress: bool) -> Result {
    let tiles = selected_tiles(config)?;
    let source = HttpTileSource::new()?;

    let progress = make_progress(multi, tiles.len() as u64, no_progress);
    for tile in &tiles {
        progress.set_message(tile.id.to_string());
        source.fetch(Resolution::ArcNinth, tile.id, &config.staging_dir)?;
        progress.inc(1);
    }
    progress.finish_with_message("tile fetch done");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    config: &RunConfig,
    multi: &MultiProgress,
    no_progress: bool,
    region: Option<String>,
    from_stage: Option<String>,
    force: bool,
    dry_run: bool,
) -> Result {
    let from_stage = from_stage
        .map(|name| {
            name.parse::<StageKind>()
                .map_err(|_| anyhow::anyhow!("unknown stage kind: {name}"))
        })
        .transpose()?;

    let catalog = config.catalog()?;
    let tiles = selected_tiles(config)?;
    let plan = apply_filters(build_plan(config, &catalog, &tiles)?, region.as_deref(), from_stage);
    if plan.is_empty() {
        anyhow::bail!("no stages match the given filters");
    }

    if dry_run {
        for stage in &plan {
            println!("{}", stage.label());
        }
        return Ok(());
    }

    let ops = GdalRasterOps::new(config.creation_options.clone());
    let driver = Driver::new(&ops, config).force(force);

    let progress = make_progress(multi, plan.len() as u64, no_progress);
    driver.run_with_progress(&plan, |_, stage, _| {
        progress.set_message(stage.label());
        progress.inc(1);
    })?;
    progress.finish_with_message("pipeline done");

    Ok(())
}

fn apply_filters(plan: Vec<StageDescriptor>, region: Option<&str>, from_stage: Option<StageKind>) -> Vec<StageDescriptor> {
    plan.into_iter()
        .filter(|stage| region.is_none_or(|code| stage.region == code))
        .filter(|stage| from_stage.is_none_or(|kind| stage.kind >= kind))
        .collect()
}

fn make_progress(multi: &MultiProgress, len: u64, no_progress: bool) -> ProgressBar {
    if no_progress {
        ProgressBar::hidden()
    } else {
        multi.add(ProgressBar::new(len))
    }
}
