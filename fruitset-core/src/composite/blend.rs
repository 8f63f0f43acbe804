use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use rand::Rng;

use crate::background::generator::BackgroundGen;
use crate::foundation::error::{FruitsetError, FruitsetResult};
use crate::foundation::fs::{list_dirs, sample_file_name, sorted_capture_layers};

/// Summary of one compositing run.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeSummary {
    /// Training images written, one per sample folder.
    pub images_written: usize,
    /// Sprite layers blended across all samples.
    pub layers_composited: usize,
    /// Sample folders skipped for having no capture layers at all.
    pub skipped_samples: usize,
}

impl CompositeSummary {
    fn absorb(&mut self, other: CompositeSummary) {
        self.images_written += other.images_written;
        self.layers_composited += other.layers_composited;
        self.skipped_samples += other.skipped_samples;
    }
}

#[tracing::instrument(skip_all)]
/// Composite a training image for every sample folder under `data_dir`.
pub fn composite_samples<R: Rng>(
    data_dir: &Path,
    generator: &mut BackgroundGen,
    rng: &mut R,
    max_splashes: u32,
) -> FruitsetResult<CompositeSummary> {
    let mut summary = CompositeSummary::default();
    for sample_dir in list_dirs(data_dir)? {
        summary.absorb(composite_sample(
            &sample_dir,
            generator,
            rng,
            max_splashes,
        )?);
    }
    Ok(summary)
}

/// Composite one sample folder's layers into its training image.
///
/// A fresh background with a uniform splash count in `[0, max_splashes]` is
/// generated, then every capture layer is drawn over it in ascending
/// sequence order with straight-alpha "over" blending. The RGB result lands
/// in the sample folder under the sample's own name (`img_<n>.png`), which
/// is what the bbox extractor's label file and the organizer's same-stem
/// pairing key on. Non-capture files are ignored.
pub fn composite_sample<R: Rng>(
    sample_dir: &Path,
    generator: &mut BackgroundGen,
    rng: &mut R,
    max_splashes: u32,
) -> FruitsetResult<CompositeSummary> {
    let mut summary = CompositeSummary::default();

    let layers = sorted_capture_layers(sample_dir)?;
    if layers.is_empty() {
        summary.skipped_samples = 1;
        return Ok(summary);
    }

    let num_splashes = rng.gen_range(0..=max_splashes);
    let mut canvas = generator.generate_background(rng, num_splashes);

    for (_, path) in &layers {
        let layer = image::open(path)
            .with_context(|| format!("decode layer '{}'", path.display()))?
            .into_rgba8();
        blend_over(&mut canvas, &layer, path)?;
        summary.layers_composited += 1;
    }

    let out = sample_dir.join(sample_file_name(sample_dir, "png"));
    image::DynamicImage::ImageRgba8(canvas)
        .into_rgb8()
        .save(&out)
        .with_context(|| format!("write training image '{}'", out.display()))?;
    summary.images_written = 1;
    Ok(summary)
}

fn blend_over(canvas: &mut RgbaImage, layer: &RgbaImage, path: &Path) -> FruitsetResult<()> {
    if canvas.dimensions() != layer.dimensions() {
        return Err(FruitsetError::validation(format!(
            "layer '{}' is {}x{} but the background is {}x{}",
            path.display(),
            layer.width(),
            layer.height(),
            canvas.width(),
            canvas.height()
        )));
    }
    for (dst, src) in canvas.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        let alpha = f32::from(src[3]) / 255.0;
        for c in 0..3 {
            let blended = (1.0 - alpha) * f32::from(dst[c]) + alpha * f32::from(src[c]);
            dst[c] = blended.round() as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
