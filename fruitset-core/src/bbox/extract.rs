use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;
use image::GrayImage;

use crate::foundation::capture::CaptureName;
use crate::foundation::error::FruitsetResult;
use crate::foundation::fs::{file_name, is_image_file, list_dirs, list_files, sample_file_name};

/// Summary of one bounding-box extraction run.
#[derive(Clone, Copy, Debug, Default)]
pub struct BboxSummary {
    /// Label files written, one per sample folder with a `masks/` directory.
    pub label_files: usize,
    /// Label lines written across all samples.
    pub boxes_written: usize,
    /// Masks with no set pixels, contributing no line.
    pub empty_masks: usize,
    /// Boxes written with the `-1` unknown-class id.
    pub unresolved_classes: usize,
    /// Sample folders skipped for lacking a `masks/` directory.
    pub skipped_samples: usize,
}

impl BboxSummary {
    fn absorb(&mut self, other: BboxSummary) {
        self.label_files += other.label_files;
        self.boxes_written += other.boxes_written;
        self.empty_masks += other.empty_masks;
        self.unresolved_classes += other.unresolved_classes;
        self.skipped_samples += other.skipped_samples;
    }
}

#[tracing::instrument(skip_all)]
/// Write a YOLO label file for every sample folder under `data_dir`.
pub fn extract_bboxes(data_dir: &Path) -> FruitsetResult<BboxSummary> {
    let mut summary = BboxSummary::default();
    for sample_dir in list_dirs(data_dir)? {
        summary.absorb(extract_sample_bboxes(&sample_dir)?);
    }
    Ok(summary)
}

/// Convert one sample's masks into its `img_<n>.txt` label file.
///
/// Each mask contributes one `class_id cx cy w h` line: the axis-aligned
/// extents of its nonzero pixels, center and size normalized by the mask's
/// own dimensions, six decimal places. All-zero masks contribute nothing.
/// Unknown class names keep the `-1` id and the line is still written;
/// downstream consumers decide what to do with it.
pub fn extract_sample_bboxes(sample_dir: &Path) -> FruitsetResult<BboxSummary> {
    let mut summary = BboxSummary::default();

    let masks_dir = sample_dir.join("masks");
    if !masks_dir.is_dir() {
        summary.skipped_samples = 1;
        return Ok(summary);
    }

    let mut lines = String::new();
    for path in list_files(&masks_dir)? {
        if !is_image_file(&path) {
            continue;
        }
        let Some(capture) = file_name(&path).and_then(CaptureName::parse) else {
            continue;
        };

        let mask = image::open(&path)
            .with_context(|| format!("decode mask '{}'", path.display()))?
            .into_luma8();
        let Some(extents) = mask_extents(&mask) else {
            summary.empty_masks += 1;
            continue;
        };

        let class_id = capture.class.id();
        if class_id < 0 {
            summary.unresolved_classes += 1;
            tracing::warn!(
                mask = %path.display(),
                class = %capture.class.base,
                "class name not in the detector table, writing id -1"
            );
        }

        let (cx, cy, w, h) = normalize(extents, mask.dimensions());
        // Infallible: writing into a String.
        let _ = writeln!(lines, "{class_id} {cx:.6} {cy:.6} {w:.6} {h:.6}");
        summary.boxes_written += 1;
    }

    let label_path = sample_dir.join(sample_file_name(sample_dir, "txt"));
    fs::write(&label_path, lines)
        .with_context(|| format!("write label file '{}'", label_path.display()))?;
    summary.label_files = 1;
    Ok(summary)
}

/// `(min_col, max_col, min_row, max_row)` of the nonzero pixels, `None` when
/// the mask is entirely zero.
fn mask_extents(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut extents: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in mask.enumerate_pixels() {
        if px.0[0] == 0 {
            continue;
        }
        extents = Some(match extents {
            None => (x, x, y, y),
            Some((min_c, max_c, min_r, max_r)) => {
                (min_c.min(x), max_c.max(x), min_r.min(y), max_r.max(y))
            }
        });
    }
    extents
}

fn normalize(
    (min_c, max_c, min_r, max_r): (u32, u32, u32, u32),
    (width, height): (u32, u32),
) -> (f64, f64, f64, f64) {
    let (width, height) = (f64::from(width), f64::from(height));
    let cx = f64::from(min_c + max_c) / 2.0 / width;
    let cy = f64::from(min_r + max_r) / 2.0 / height;
    let w = f64::from(max_c - min_c) / width;
    let h = f64::from(max_r - min_r) / height;
    (cx, cy, w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/bbox/extract.rs"]
mod tests;
