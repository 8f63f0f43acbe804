use std::path::Path;

use anyhow::Context;
use image::{GrayImage, RgbImage};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::foundation::capture::CaptureName;
use crate::foundation::error::FruitsetResult;
use crate::foundation::fs::{
    ensure_dir, file_name, is_image_file, list_dirs, list_files, sample_file_name,
};

/// Per-fruit overlay colors, matched by lowercase substring of the class
/// name; unknown classes render gray.
const CLASS_COLORS: [(&str, [u8; 3]); 12] = [
    ("watermelon", [255, 99, 71]),
    ("bomb", [255, 0, 0]),
    ("banana", [255, 255, 0]),
    ("blueberry", [0, 0, 255]),
    ("orange", [255, 165, 0]),
    ("lemon", [255, 255, 102]),
    ("coconut", [139, 69, 19]),
    ("pineapple", [204, 174, 0]),
    ("apple", [55, 171, 0]),
    ("kiwi", [85, 107, 47]),
    ("peach", [255, 180, 130]),
    ("mango", [255, 130, 0]),
];

const FALLBACK_COLOR: [u8; 3] = [128, 128, 128];

/// Summary of one visualization run.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisualizeSummary {
    /// Overlay images written.
    pub overlays_written: usize,
    /// Chosen samples skipped for a missing training image or `masks/`.
    pub skipped_samples: usize,
}

#[tracing::instrument(skip_all)]
/// Write debug overlays for up to `num_samples` randomly chosen samples.
///
/// Each overlay is the sample's composited training image with every mask's
/// pixels tinted 50/50 toward its class color and a 2px rectangle drawn
/// around the mask extents. Purely a spot-check aid for collected data;
/// nothing downstream reads these files.
pub fn visualize_samples<R: Rng>(
    data_dir: &Path,
    out_dir: &Path,
    num_samples: usize,
    rng: &mut R,
) -> FruitsetResult<VisualizeSummary> {
    let mut sample_dirs = list_dirs(data_dir)?;
    sample_dirs.shuffle(rng);
    sample_dirs.truncate(num_samples);
    ensure_dir(out_dir)?;

    let mut summary = VisualizeSummary::default();
    for sample_dir in &sample_dirs {
        let image_path = sample_dir.join(sample_file_name(sample_dir, "png"));
        let masks_dir = sample_dir.join("masks");
        if !image_path.is_file() || !masks_dir.is_dir() {
            summary.skipped_samples += 1;
            continue;
        }

        let mut overlay = image::open(&image_path)
            .with_context(|| format!("decode training image '{}'", image_path.display()))?
            .into_rgb8();
        for mask_path in list_files(&masks_dir)? {
            if !is_image_file(&mask_path) {
                continue;
            }
            let Some(capture) = file_name(&mask_path).and_then(CaptureName::parse) else {
                continue;
            };
            let mask = image::open(&mask_path)
                .with_context(|| format!("decode mask '{}'", mask_path.display()))?
                .into_luma8();
            paint_mask(&mut overlay, &mask, class_color(&capture.class.base));
        }

        let stem = file_name(sample_dir).unwrap_or("sample");
        let out = out_dir.join(format!("overlay_{stem}.png"));
        overlay
            .save(&out)
            .with_context(|| format!("write overlay '{}'", out.display()))?;
        summary.overlays_written += 1;
    }
    Ok(summary)
}

fn class_color(class_name: &str) -> [u8; 3] {
    let lower = class_name.to_lowercase();
    CLASS_COLORS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map_or(FALLBACK_COLOR, |(_, color)| *color)
}

fn paint_mask(overlay: &mut RgbImage, mask: &GrayImage, color: [u8; 3]) {
    let (w, h) = overlay.dimensions();
    let mut extents: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in mask.enumerate_pixels() {
        if px.0[0] == 0 || x >= w || y >= h {
            continue;
        }
        let dst = overlay.get_pixel_mut(x, y);
        for c in 0..3 {
            dst.0[c] = ((u16::from(dst.0[c]) + u16::from(color[c])) / 2) as u8;
        }
        extents = Some(match extents {
            None => (x, x, y, y),
            Some((min_c, max_c, min_r, max_r)) => {
                (min_c.min(x), max_c.max(x), min_r.min(y), max_r.max(y))
            }
        });
    }
    if let Some(rect) = extents {
        draw_rect(overlay, rect, color);
    }
}

// 2px rectangle around the mask extents, clamped to the image.
fn draw_rect(overlay: &mut RgbImage, (min_c, max_c, min_r, max_r): (u32, u32, u32, u32), color: [u8; 3]) {
    let (w, h) = overlay.dimensions();
    let mut put = |x: u32, y: u32| {
        if x < w && y < h {
            overlay.put_pixel(x, y, image::Rgb(color));
        }
    };
    for t in 0..2u32 {
        for x in min_c.saturating_sub(t)..=(max_c + t).min(w.saturating_sub(1)) {
            put(x, min_r.saturating_sub(t));
            put(x, (max_r + t).min(h.saturating_sub(1)));
        }
        for y in min_r.saturating_sub(t)..=(max_r + t).min(h.saturating_sub(1)) {
            put(min_c.saturating_sub(t), y);
            put((max_c + t).min(w.saturating_sub(1)), y);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visualize/overlay.rs"]
mod tests;
