use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{GrayImage, RgbaImage};

use crate::foundation::capture::{CaptureName, Sequence};
use crate::foundation::classes::ClassVariant;
use crate::foundation::error::{FruitsetError, FruitsetResult};
use crate::foundation::fs::{empty_dir, file_name, list_dirs, list_files, sorted_capture_layers};

/// Masks with fewer set pixels than this are treated as diff noise.
const MIN_MASK_PIXELS: usize = 2;

/// Summary of one mask-generation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskSummary {
    /// Per-layer masks written (before any bomb merge).
    pub masks_written: usize,
    /// Masks discarded as noise.
    pub suppressed_masks: usize,
    /// Bomb body/outline pairs merged into a union mask.
    pub bomb_merges: usize,
    /// Bomb captures found without their merge partner.
    pub asymmetric_bombs: usize,
    /// Sample folders skipped because their first layer is not sequence 0.
    pub skipped_samples: usize,
}

impl MaskSummary {
    fn absorb(&mut self, other: MaskSummary) {
        self.masks_written += other.masks_written;
        self.suppressed_masks += other.suppressed_masks;
        self.bomb_merges += other.bomb_merges;
        self.asymmetric_bombs += other.asymmetric_bombs;
        self.skipped_samples += other.skipped_samples;
    }
}

#[tracing::instrument(skip_all)]
/// Regenerate the `masks/` directory of every sample folder under `data_dir`.
pub fn generate_masks(data_dir: &Path) -> FruitsetResult<MaskSummary> {
    let mut summary = MaskSummary::default();
    for sample_dir in list_dirs(data_dir)? {
        summary.absorb(generate_sample_masks(&sample_dir)?);
    }
    Ok(summary)
}

/// Regenerate `masks/` for one sample folder.
///
/// Layer 0's mask is its own alpha channel; each later layer's mask is the
/// alpha of its frame diff against the previous layer (a pixel counts as
/// changed when the previous alpha is 0 or the RGBA tuples differ). Terminal
/// layers contribute no mask. Bomb body/outline mask pairs are merged into a
/// single `x-x-bomb.png` union afterwards.
pub fn generate_sample_masks(sample_dir: &Path) -> FruitsetResult<MaskSummary> {
    let mut summary = MaskSummary::default();

    // Re-guard against folders the sorter never validated.
    let layers = sorted_capture_layers(sample_dir)?;
    let starts_at_zero = layers
        .first()
        .is_some_and(|(capture, _)| capture.sequence == Sequence::Index(0));
    if !starts_at_zero {
        summary.skipped_samples = 1;
        return Ok(summary);
    }

    let masks_dir = sample_dir.join("masks");
    empty_dir(&masks_dir)?;

    let mut prev: Option<RgbaImage> = None;
    for (capture, path) in &layers {
        if capture.sequence.is_terminal() {
            continue;
        }
        let layer = image::open(path)
            .with_context(|| format!("decode layer '{}'", path.display()))?
            .into_rgba8();
        let mask = match prev.as_ref() {
            None => alpha_mask(&layer),
            Some(prev) => diff_mask(prev, &layer, path)?,
        };
        if count_nonzero(&mask) < MIN_MASK_PIXELS {
            summary.suppressed_masks += 1;
        } else {
            let Some(name) = file_name(path) else {
                continue;
            };
            let out = masks_dir.join(name);
            mask.save(&out)
                .with_context(|| format!("write mask '{}'", out.display()))?;
            summary.masks_written += 1;
        }
        prev = Some(layer);
    }

    merge_bomb_masks(&masks_dir, &mut summary)?;
    Ok(summary)
}

fn alpha_mask(layer: &RgbaImage) -> GrayImage {
    let (w, h) = layer.dimensions();
    let mut mask = GrayImage::new(w, h);
    for (px, m) in layer.chunks_exact(4).zip(mask.iter_mut()) {
        *m = px[3];
    }
    mask
}

fn diff_mask(prev: &RgbaImage, curr: &RgbaImage, path: &Path) -> FruitsetResult<GrayImage> {
    if prev.dimensions() != curr.dimensions() {
        return Err(FruitsetError::validation(format!(
            "layer '{}' is {}x{} but the previous layer is {}x{}",
            path.display(),
            curr.width(),
            curr.height(),
            prev.width(),
            prev.height()
        )));
    }
    let (w, h) = curr.dimensions();
    let mut mask = GrayImage::new(w, h);
    for ((p, c), m) in prev
        .chunks_exact(4)
        .zip(curr.chunks_exact(4))
        .zip(mask.iter_mut())
    {
        if p[3] == 0 || p != c {
            *m = c[3];
        }
    }
    Ok(mask)
}

fn count_nonzero(mask: &GrayImage) -> usize {
    mask.iter().filter(|v| **v != 0).count()
}

// Bomb captures arrive as separate body and outline layers of one object;
// the detector wants a single box for both.
fn merge_bomb_masks(masks_dir: &Path, summary: &mut MaskSummary) -> FruitsetResult<()> {
    let mut body: Option<PathBuf> = None;
    let mut outline: Option<PathBuf> = None;
    for path in list_files(masks_dir)? {
        let Some(capture) = file_name(&path).and_then(CaptureName::parse) else {
            continue;
        };
        match capture.class.variant {
            ClassVariant::BombBody => body = Some(path),
            ClassVariant::BombOutline => outline = Some(path),
            ClassVariant::Standard => {}
        }
    }

    match (body, outline) {
        (Some(body), Some(outline)) => {
            let merged = union_masks(&body, &outline)?;
            let out = masks_dir.join("x-x-bomb.png");
            merged
                .save(&out)
                .with_context(|| format!("write merged bomb mask '{}'", out.display()))?;
            fs::remove_file(&body)
                .with_context(|| format!("remove merged source '{}'", body.display()))?;
            fs::remove_file(&outline)
                .with_context(|| format!("remove merged source '{}'", outline.display()))?;
            summary.bomb_merges += 1;
        }
        (Some(single), None) | (None, Some(single)) => {
            summary.asymmetric_bombs += 1;
            tracing::warn!(
                mask = %single.display(),
                "bomb capture without its merge partner, leaving the mask unmerged"
            );
        }
        (None, None) => {}
    }
    Ok(())
}

fn union_masks(a: &Path, b: &Path) -> FruitsetResult<GrayImage> {
    let a_img = load_mask(a)?;
    let b_img = load_mask(b)?;
    if a_img.dimensions() != b_img.dimensions() {
        return Err(FruitsetError::validation(format!(
            "bomb masks '{}' and '{}' differ in size",
            a.display(),
            b.display()
        )));
    }

    let (w, h) = a_img.dimensions();
    let mut merged = GrayImage::new(w, h);
    for ((a_px, b_px), m) in a_img.iter().zip(b_img.iter()).zip(merged.iter_mut()) {
        if *a_px > 128 || *b_px > 128 {
            *m = 255;
        }
    }
    Ok(merged)
}

fn load_mask(path: &Path) -> FruitsetResult<GrayImage> {
    Ok(image::open(path)
        .with_context(|| format!("decode mask '{}'", path.display()))?
        .into_luma8())
}

#[cfg(test)]
#[path = "../../tests/unit/mask/diff.rs"]
mod tests;
