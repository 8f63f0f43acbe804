use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::foundation::classes::CLASS_NAMES;
use crate::foundation::error::FruitsetResult;

/// Write the `data.yaml` manifest describing a YOLO dataset layout.
///
/// The document carries the dataset root, the three split directories
/// relative to it, and the full ordered id → class-name map. Built by hand;
/// the shape is small and fixed, so a YAML dependency buys nothing.
pub fn write_manifest(yolo_dir: &Path) -> FruitsetResult<()> {
    let mut doc = String::new();
    // Infallible: writing into a String.
    let _ = writeln!(doc, "path: {}", yolo_dir.display());
    let _ = writeln!(doc, "train: images/train");
    let _ = writeln!(doc, "val: images/val");
    let _ = writeln!(doc, "test: images/test");
    let _ = writeln!(doc, "names:");
    for (id, name) in CLASS_NAMES.iter().enumerate() {
        let _ = writeln!(doc, "  {id}: {name}");
    }

    let path = yolo_dir.join("data.yaml");
    fs::write(&path, doc).with_context(|| format!("write manifest '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/manifest.rs"]
mod tests;
