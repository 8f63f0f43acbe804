use std::path::Path;

use anyhow::Context;

use crate::foundation::capture::CaptureName;
use crate::foundation::error::FruitsetResult;
use crate::foundation::fs::{file_name, is_image_file, list_dirs, list_files};

/// Summary of one chroma-key removal run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentSummary {
    /// Layers rewritten with the key color removed.
    pub segmented_layers: usize,
    /// Terminal layers and non-capture files left untouched.
    pub skipped_files: usize,
}

#[tracing::instrument(skip_all)]
/// Replace every exact `chroma_key` RGB match with full transparency in all
/// non-terminal capture layers under `data_dir`, saving each layer in place.
///
/// Terminal layers arrive already transparent and are skipped. The match is
/// exact equality; antialiased capture edges keep their halo.
pub fn segment_samples(data_dir: &Path, chroma_key: [u8; 3]) -> FruitsetResult<SegmentSummary> {
    let mut summary = SegmentSummary::default();
    for sample_dir in list_dirs(data_dir)? {
        for path in list_files(&sample_dir)? {
            let is_layer = is_image_file(&path)
                && file_name(&path)
                    .and_then(CaptureName::parse)
                    .is_some_and(|capture| !capture.sequence.is_terminal());
            if !is_layer {
                summary.skipped_files += 1;
                continue;
            }
            segment_layer(&path, chroma_key)?;
            summary.segmented_layers += 1;
        }
    }
    Ok(summary)
}

fn segment_layer(path: &Path, chroma_key: [u8; 3]) -> FruitsetResult<()> {
    let mut img = image::open(path)
        .with_context(|| format!("decode layer '{}'", path.display()))?
        .into_rgba8();
    for px in img.chunks_exact_mut(4) {
        if px[..3] == chroma_key {
            px.copy_from_slice(&[0, 0, 0, 0]);
        }
    }
    img.save(path)
        .with_context(|| format!("write layer '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/segment/chroma.rs"]
mod tests;
