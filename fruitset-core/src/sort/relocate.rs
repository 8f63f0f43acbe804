use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::foundation::capture::CaptureName;
use crate::foundation::error::{FruitsetError, FruitsetResult};
use crate::foundation::fs::{empty_dir, file_name, list_files, next_sample_index, require_dir};
use crate::sort::groups::{AnimationGroup, group_captures};

/// Options for the raw-capture sorting stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortOpts {
    /// Empty the raw directory once every accepted group is relocated.
    /// Destructive: rejected and skipped files are removed with it.
    pub purge_raw: bool,
}

/// Summary of one sorting run.
#[derive(Clone, Debug, Default)]
pub struct SortSummary {
    /// Sample folder names created, in creation order.
    pub samples: Vec<String>,
    /// Files skipped for malformed names.
    pub skipped_files: usize,
    /// Whole groups rejected for sequence gaps or a nonzero start.
    pub rejected_groups: usize,
}

#[tracing::instrument(skip_all)]
/// Validate raw captures and move each accepted animation group into the
/// next free `img_<n>` sample folder under `data_dir`.
///
/// Groups whose last layer is not terminal get a synthesized
/// `x-x-EntireFrame.png` decoded from `placeholder`. Rejected groups and
/// unparseable files stay in `raw_dir` unless [`SortOpts::purge_raw`] is set.
pub fn sort_raw_captures(
    raw_dir: &Path,
    data_dir: &Path,
    placeholder: &Path,
    opts: SortOpts,
) -> FruitsetResult<SortSummary> {
    require_dir(data_dir)?;
    if !placeholder.is_file() {
        return Err(FruitsetError::missing_resource(format!(
            "terminal placeholder '{}'",
            placeholder.display()
        )));
    }

    let mut file_names = Vec::new();
    for path in list_files(raw_dir)? {
        let Some(name) = file_name(&path) else {
            continue;
        };
        file_names.push(name.to_string());
    }

    let outcome = group_captures(&file_names);
    for animation in &outcome.rejected_groups {
        tracing::warn!(animation = %animation, "dropping animation group with bad sequence numbering");
    }
    if !outcome.skipped_files.is_empty() {
        tracing::warn!(
            count = outcome.skipped_files.len(),
            "skipping files without capture names"
        );
    }

    let mut summary = SortSummary {
        samples: Vec::new(),
        skipped_files: outcome.skipped_files.len(),
        rejected_groups: outcome.rejected_groups.len(),
    };

    let mut next_index = next_sample_index(data_dir)?;
    for group in &outcome.accepted {
        let sample_name = format!("img_{next_index}");
        next_index += 1;

        let sample_dir = data_dir.join(&sample_name);
        empty_dir(&sample_dir)?;
        for name in &group.files {
            let from = raw_dir.join(name);
            let to = sample_dir.join(name);
            fs::rename(&from, &to)
                .with_context(|| format!("move '{}' to '{}'", from.display(), to.display()))?;
        }
        if !ends_terminal(group) {
            synthesize_terminal(placeholder, &sample_dir)?;
        }

        summary.samples.push(sample_name);
    }

    if opts.purge_raw {
        empty_dir(raw_dir)?;
    }

    Ok(summary)
}

fn ends_terminal(group: &AnimationGroup) -> bool {
    let Some(last) = group.files.last() else {
        return false;
    };
    CaptureName::parse(last).is_some_and(|capture| capture.sequence.is_terminal())
}

// The synthesized layer must be a real PNG regardless of the placeholder's
// own format, hence decode + re-encode instead of a byte copy.
fn synthesize_terminal(placeholder: &Path, sample_dir: &Path) -> FruitsetResult<()> {
    let img = image::open(placeholder)
        .with_context(|| format!("decode placeholder '{}'", placeholder.display()))?;
    let to = sample_dir.join("x-x-EntireFrame.png");
    img.save(&to)
        .with_context(|| format!("write terminal layer '{}'", to.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sort/relocate.rs"]
mod tests;
