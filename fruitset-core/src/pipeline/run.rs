use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::background::generator::BackgroundGen;
use crate::bbox::extract::{BboxSummary, extract_bboxes};
use crate::composite::blend::{CompositeSummary, composite_samples};
use crate::dataset::organize::{OrganizeSummary, organize_dataset};
use crate::foundation::error::FruitsetResult;
use crate::foundation::fs::ensure_dir;
use crate::mask::diff::{MaskSummary, generate_masks};
use crate::pipeline::config::PipelineConfig;
use crate::segment::chroma::{SegmentSummary, segment_samples};
use crate::sort::relocate::{SortOpts, SortSummary, sort_raw_captures};

/// Options for a full pipeline run.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineOpts {
    /// Empty the raw capture directory after sorting (destructive, opt-in).
    pub purge_raw: bool,
}

/// Per-stage summaries of a full pipeline run.
#[derive(Clone, Debug, Default)]
pub struct PipelineSummary {
    /// Raw-capture sorting outcome.
    pub sort: SortSummary,
    /// Chroma-key removal outcome.
    pub segment: SegmentSummary,
    /// Mask generation outcome.
    pub masks: MaskSummary,
    /// Compositing outcome.
    pub composite: CompositeSummary,
    /// Label extraction outcome.
    pub bboxes: BboxSummary,
    /// Train/val/test split outcome.
    pub organize: OrganizeSummary,
}

/// Pipeline RNG from an optional seed; `None` draws from OS entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[tracing::instrument(skip_all)]
/// Run every pipeline stage in order against `config`'s directory layout.
///
/// Sort → segment → masks → composite → bboxes → organize, sample folders in
/// sorted order, one seeded RNG threaded through the random stages. The raw
/// directory must already exist; `data/` and `YOLOformat/` are created as
/// needed. Any stage error aborts the run.
pub fn run_pipeline(config: &PipelineConfig, opts: PipelineOpts) -> FruitsetResult<PipelineSummary> {
    let mut rng = seeded_rng(config.seed);
    let data_dir = config.data_dir();
    ensure_dir(&data_dir)?;

    let sort = sort_raw_captures(
        &config.raw_dir(),
        &data_dir,
        &config.placeholder_path(),
        SortOpts {
            purge_raw: opts.purge_raw,
        },
    )?;
    tracing::info!(
        samples = sort.samples.len(),
        rejected = sort.rejected_groups,
        "sorted raw captures"
    );

    let segment = segment_samples(&data_dir, config.chroma_key)?;
    tracing::info!(layers = segment.segmented_layers, "removed chroma key");

    let masks = generate_masks(&data_dir)?;
    tracing::info!(
        written = masks.masks_written,
        merged = masks.bomb_merges,
        "generated masks"
    );

    let mut generator = BackgroundGen::new(&config.resource_dir)?;
    let composite = composite_samples(&data_dir, &mut generator, &mut rng, config.max_splashes)?;
    tracing::info!(images = composite.images_written, "composited training images");

    let bboxes = extract_bboxes(&data_dir)?;
    tracing::info!(boxes = bboxes.boxes_written, "extracted bounding boxes");

    let organize = organize_dataset(&data_dir, &config.yolo_dir(), config.split, &mut rng)?;
    tracing::info!(
        train = organize.train,
        val = organize.val,
        test = organize.test,
        "organized dataset splits"
    );

    Ok(PipelineSummary {
        sort,
        segment,
        masks,
        composite,
        bboxes,
        organize,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
