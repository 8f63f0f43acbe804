use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use rand::Rng;

use crate::foundation::error::{FruitsetError, FruitsetResult};
use crate::foundation::fs::{file_name, is_image_file, list_files, require_dir};

/// Randomized background composer over preloaded resource decals.
///
/// Construction front-loads all IO: the base `background.png` and every
/// image whose name contains `splash` are decoded once and held in memory.
/// Splash buffers are recolored in place on every use, so generated
/// backgrounds drift in palette across calls; callers that need
/// reproducibility control the [`Rng`] they pass in, not the buffers.
#[derive(Debug)]
pub struct BackgroundGen {
    base: RgbaImage,
    splashes: Vec<RgbaImage>,
}

impl BackgroundGen {
    /// Load the base background and splash decals from `resource_dir`.
    ///
    /// Fails with a missing-resource error when `background.png` or every
    /// splash is absent, and with a validation error when a splash is larger
    /// than the background (placement could never fit it).
    pub fn new(resource_dir: &Path) -> FruitsetResult<Self> {
        require_dir(resource_dir)?;

        let base_path = resource_dir.join("background.png");
        if !base_path.is_file() {
            return Err(FruitsetError::missing_resource(format!(
                "background image '{}'",
                base_path.display()
            )));
        }
        let base = image::open(&base_path)
            .with_context(|| format!("decode background '{}'", base_path.display()))?
            .into_rgba8();

        let mut splashes = Vec::new();
        for path in list_files(resource_dir)? {
            let Some(name) = file_name(&path) else {
                continue;
            };
            if !name.contains("splash") || !is_image_file(&path) {
                continue;
            }
            let splash = image::open(&path)
                .with_context(|| format!("decode splash '{}'", path.display()))?
                .into_rgba8();
            if splash.width() > base.width() || splash.height() > base.height() {
                return Err(FruitsetError::validation(format!(
                    "splash '{name}' ({}x{}) does not fit the {}x{} background",
                    splash.width(),
                    splash.height(),
                    base.width(),
                    base.height()
                )));
            }
            splashes.push(splash);
        }
        if splashes.is_empty() {
            return Err(FruitsetError::missing_resource(format!(
                "no splash images under '{}'",
                resource_dir.display()
            )));
        }

        Ok(Self { base, splashes })
    }

    /// Width and height of generated backgrounds.
    pub fn dimensions(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    /// Compose a fresh copy of the base background with `num_splashes`
    /// randomly chosen, recolored and placed splash decals.
    ///
    /// Each splash gets a uniform per-channel RGB shift in `[-255, 255]`
    /// (applied in place to the stored decal, clamped to `[0, 255]`) and a
    /// uniform offset keeping it entirely inside the background, then blends
    /// by its own alpha.
    pub fn generate_background<R: Rng>(&mut self, rng: &mut R, num_splashes: u32) -> RgbaImage {
        let mut out = self.base.clone();
        for _ in 0..num_splashes {
            let idx = rng.gen_range(0..self.splashes.len());
            shift_colors(&mut self.splashes[idx], rng);

            let splash = &self.splashes[idx];
            let x0 = rng.gen_range(0..=self.base.width() - splash.width());
            let y0 = rng.gen_range(0..=self.base.height() - splash.height());
            blend_splash(&mut out, splash, x0, y0);
        }
        out
    }
}

fn shift_colors<R: Rng>(splash: &mut RgbaImage, rng: &mut R) {
    let shift = [
        rng.gen_range(-255i32..=255),
        rng.gen_range(-255i32..=255),
        rng.gen_range(-255i32..=255),
    ];
    for px in splash.chunks_exact_mut(4) {
        for c in 0..3 {
            px[c] = (i32::from(px[c]) + shift[c]).clamp(0, 255) as u8;
        }
    }
}

fn blend_splash(out: &mut RgbaImage, splash: &RgbaImage, x0: u32, y0: u32) {
    for y in 0..splash.height() {
        for x in 0..splash.width() {
            let src = splash.get_pixel(x, y).0;
            let dst = out.get_pixel_mut(x0 + x, y0 + y);
            let alpha = f32::from(src[3]) / 255.0;
            for c in 0..3 {
                let blended = (1.0 - alpha) * f32::from(dst.0[c]) + alpha * f32::from(src[c]);
                dst.0[c] = blended.round() as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/background/generator.rs"]
mod tests;
