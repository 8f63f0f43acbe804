use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fruitset::{
    BackgroundGen, PipelineConfig, PipelineOpts, SortOpts, composite_samples, extract_bboxes,
    generate_masks, organize_dataset, run_pipeline, seeded_rng, segment_samples,
    sort_raw_captures, visualize_samples,
};

#[derive(Parser, Debug)]
#[command(name = "fruitset", version)]
struct Cli {
    /// Pipeline settings JSON.
    #[arg(long, global = true, default_value = "settings.json")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate raw captures and move them into sample folders.
    Sort(SortArgs),
    /// Key the capture background color out to transparency.
    Segment,
    /// Generate per-object masks by frame differencing.
    Masks,
    /// Composite sample layers over randomized backgrounds.
    Composite,
    /// Convert masks into YOLO label files.
    Bboxes,
    /// Shuffle and split pairs into the YOLO dataset layout.
    Organize,
    /// Write mask/bbox overlay images for spot checking.
    Visualize(VisualizeArgs),
    /// Run every stage in order.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct SortArgs {
    /// Empty the raw directory afterwards (destructive).
    #[arg(long, default_value_t = false)]
    purge_raw: bool,
}

#[derive(Parser, Debug)]
struct VisualizeArgs {
    /// Output directory for overlay images.
    #[arg(long)]
    out: PathBuf,

    /// Number of randomly chosen samples to render.
    #[arg(long, default_value_t = 2)]
    samples: usize,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Empty the raw directory after sorting (destructive).
    #[arg(long, default_value_t = false)]
    purge_raw: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = PipelineConfig::from_path(&cli.config)?;
    match cli.cmd {
        Command::Sort(args) => cmd_sort(&config, args),
        Command::Segment => cmd_segment(&config),
        Command::Masks => cmd_masks(&config),
        Command::Composite => cmd_composite(&config),
        Command::Bboxes => cmd_bboxes(&config),
        Command::Organize => cmd_organize(&config),
        Command::Visualize(args) => cmd_visualize(&config, args),
        Command::Run(args) => cmd_run(&config, args),
    }
}

fn cmd_sort(config: &PipelineConfig, args: SortArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(config.data_dir())?;
    let summary = sort_raw_captures(
        &config.raw_dir(),
        &config.data_dir(),
        &config.placeholder_path(),
        SortOpts {
            purge_raw: args.purge_raw,
        },
    )?;
    eprintln!(
        "sorted {} samples ({} groups rejected, {} files skipped)",
        summary.samples.len(),
        summary.rejected_groups,
        summary.skipped_files
    );
    Ok(())
}

fn cmd_segment(config: &PipelineConfig) -> anyhow::Result<()> {
    let summary = segment_samples(&config.data_dir(), config.chroma_key)?;
    eprintln!("segmented {} layers", summary.segmented_layers);
    Ok(())
}

fn cmd_masks(config: &PipelineConfig) -> anyhow::Result<()> {
    let summary = generate_masks(&config.data_dir())?;
    eprintln!(
        "wrote {} masks ({} suppressed, {} bomb merges, {} asymmetric bombs)",
        summary.masks_written,
        summary.suppressed_masks,
        summary.bomb_merges,
        summary.asymmetric_bombs
    );
    Ok(())
}

fn cmd_composite(config: &PipelineConfig) -> anyhow::Result<()> {
    let mut generator = BackgroundGen::new(&config.resource_dir)?;
    let mut rng = seeded_rng(config.seed);
    let summary = composite_samples(
        &config.data_dir(),
        &mut generator,
        &mut rng,
        config.max_splashes,
    )?;
    eprintln!("composited {} training images", summary.images_written);
    Ok(())
}

fn cmd_bboxes(config: &PipelineConfig) -> anyhow::Result<()> {
    let summary = extract_bboxes(&config.data_dir())?;
    eprintln!(
        "wrote {} boxes into {} label files ({} unresolved classes)",
        summary.boxes_written, summary.label_files, summary.unresolved_classes
    );
    Ok(())
}

fn cmd_organize(config: &PipelineConfig) -> anyhow::Result<()> {
    let mut rng = seeded_rng(config.seed);
    let summary = organize_dataset(
        &config.data_dir(),
        &config.yolo_dir(),
        config.split,
        &mut rng,
    )?;
    eprintln!(
        "organized {} train / {} val / {} test pairs",
        summary.train, summary.val, summary.test
    );
    Ok(())
}

fn cmd_visualize(config: &PipelineConfig, args: VisualizeArgs) -> anyhow::Result<()> {
    let mut rng = seeded_rng(config.seed);
    let summary = visualize_samples(&config.data_dir(), &args.out, args.samples, &mut rng)?;
    eprintln!("wrote {} overlays to {}", summary.overlays_written, args.out.display());
    Ok(())
}

fn cmd_run(config: &PipelineConfig, args: RunArgs) -> anyhow::Result<()> {
    let summary = run_pipeline(
        config,
        PipelineOpts {
            purge_raw: args.purge_raw,
        },
    )?;
    eprintln!(
        "pipeline finished: {} samples, {} masks, {} images, {} boxes, {}/{}/{} split",
        summary.sort.samples.len(),
        summary.masks.masks_written,
        summary.composite.images_written,
        summary.bboxes.boxes_written,
        summary.organize.train,
        summary.organize.val,
        summary.organize.test
    );
    Ok(())
}
