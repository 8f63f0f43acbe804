use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::dataset::manifest::write_manifest;
use crate::foundation::error::FruitsetResult;
use crate::foundation::fs::{ensure_dir, file_name, is_image_file, require_dir};
use crate::pipeline::config::SplitRatios;

const SPLITS: [&str; 3] = ["train", "val", "test"];

/// Summary of one dataset-organization run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
    /// Pairs copied into the training split.
    pub train: usize,
    /// Pairs copied into the validation split.
    pub val: usize,
    /// Pairs copied into the test split.
    pub test: usize,
}

#[tracing::instrument(skip_all)]
/// Shuffle every `(image, same-stem .txt)` pair under `data_dir` into the
/// YOLO directory layout rooted at `yolo_dir`.
///
/// Pairs are collected recursively, shuffled with the caller's [`Rng`] and
/// split by cumulative counts: `floor(train·N)` pairs train,
/// `floor(val·N)` val, the remainder test. Files are copied, never moved;
/// the sample folders stay intact. Finishes by writing the `data.yaml`
/// manifest next to the split directories.
pub fn organize_dataset<R: Rng>(
    data_dir: &Path,
    yolo_dir: &Path,
    ratios: SplitRatios,
    rng: &mut R,
) -> FruitsetResult<OrganizeSummary> {
    require_dir(data_dir)?;
    ratios.validate()?;

    let mut pairs = Vec::new();
    collect_pairs(data_dir, &mut pairs)?;
    pairs.shuffle(rng);

    let total = pairs.len();
    let train_count = (ratios.train * total as f64).floor() as usize;
    let val_count = (ratios.val * total as f64).floor() as usize;

    for split in SPLITS {
        ensure_dir(&yolo_dir.join("images").join(split))?;
        ensure_dir(&yolo_dir.join("labels").join(split))?;
    }

    let mut summary = OrganizeSummary::default();
    for (i, (image, label)) in pairs.iter().enumerate() {
        let split = if i < train_count {
            summary.train += 1;
            "train"
        } else if i < train_count + val_count {
            summary.val += 1;
            "val"
        } else {
            summary.test += 1;
            "test"
        };
        copy_into(image, &yolo_dir.join("images").join(split))?;
        copy_into(label, &yolo_dir.join("labels").join(split))?;
    }

    write_manifest(yolo_dir)?;
    Ok(summary)
}

// Sample folders are one level deep today, but the walk is recursive so a
// reorganized data root keeps working.
fn collect_pairs(dir: &Path, pairs: &mut Vec<(PathBuf, PathBuf)>) -> FruitsetResult<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory '{}'", dir.display()))?;
        children.push(entry.path());
    }
    children.sort();

    for path in children {
        if path.is_dir() {
            collect_pairs(&path, pairs)?;
            continue;
        }
        if !is_image_file(&path) {
            continue;
        }
        let label = path.with_extension("txt");
        if label.is_file() {
            pairs.push((path, label));
        }
    }
    Ok(())
}

fn copy_into(file: &Path, target_dir: &Path) -> FruitsetResult<()> {
    let Some(name) = file_name(file) else {
        return Ok(());
    };
    let target = target_dir.join(name);
    fs::copy(file, &target)
        .with_context(|| format!("copy '{}' to '{}'", file.display(), target.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/organize.rs"]
mod tests;
