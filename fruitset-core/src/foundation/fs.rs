use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::capture::CaptureName;
use crate::foundation::error::{FruitsetError, FruitsetResult};

/// File extensions treated as images when scanning capture directories.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// Error unless `path` is an existing directory.
pub fn require_dir(path: &Path) -> FruitsetResult<()> {
    if !path.is_dir() {
        return Err(FruitsetError::missing_directory(path));
    }
    Ok(())
}

/// Create `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> FruitsetResult<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory '{}'", path.display()))?;
    Ok(())
}

/// Reset `path` to an existing empty directory.
pub fn empty_dir(path: &Path) -> FruitsetResult<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("clear directory '{}'", path.display()))?;
    }
    ensure_dir(path)
}

/// Regular files directly under `dir`, sorted by path.
pub fn list_files(dir: &Path) -> FruitsetResult<Vec<PathBuf>> {
    list_entries(dir, |path| path.is_file())
}

/// Directories directly under `dir`, sorted by path.
pub fn list_dirs(dir: &Path) -> FruitsetResult<Vec<PathBuf>> {
    list_entries(dir, |path| path.is_dir())
}

fn list_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> FruitsetResult<Vec<PathBuf>> {
    require_dir(dir)?;
    let mut out = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory '{}'", dir.display()))?;
        let path = entry.path();
        if keep(&path) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Whether `path` carries a recognized image extension.
pub fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
}

/// UTF-8 file name of `path`, when it has one.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// `<sample>.<ext>` artifact name for a sample folder, e.g. `img_3.png`.
pub fn sample_file_name(sample_dir: &Path, ext: &str) -> String {
    let stem = file_name(sample_dir).unwrap_or("sample");
    format!("{stem}.{ext}")
}

/// Next unused `img_<n>` index under `dir`.
///
/// Scans every entry (file or folder) named `img_<n>` or `img_<n>.<ext>` and
/// returns one past the highest `n`; `0` when none match.
pub fn next_sample_index(dir: &Path) -> FruitsetResult<u32> {
    require_dir(dir)?;
    let mut next = 0u32;
    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory '{}'", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(suffix) = name.strip_prefix("img_") else {
            continue;
        };
        let digits = suffix.split_once('.').map_or(suffix, |(d, _)| d);
        let Ok(n) = digits.parse::<u32>() else {
            continue;
        };
        next = next.max(n + 1);
    }
    Ok(next)
}

/// Capture-named image layers of a sample folder, ascending sequence order.
///
/// Non-image and non-capture entries (masks subfolder, composited output,
/// label file) are ignored, so the listing is stable across pipeline stages.
pub fn sorted_capture_layers(sample_dir: &Path) -> FruitsetResult<Vec<(CaptureName, PathBuf)>> {
    let mut layers = Vec::new();
    for path in list_files(sample_dir)? {
        if !is_image_file(&path) {
            continue;
        }
        let Some(name) = file_name(&path) else {
            continue;
        };
        let Some(capture) = CaptureName::parse(name) else {
            continue;
        };
        layers.push((capture, path));
    }
    layers.sort_by_key(|(capture, _)| capture.sequence);
    Ok(layers)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
