use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{FruitsetError, FruitsetResult};

/// Train/val/test split fractions used by the dataset organizer.
///
/// The test fraction is implicit: whatever remains after the train and val
/// counts are floored off.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct SplitRatios {
    /// Fraction of pairs assigned to the training split.
    #[serde(default = "default_train_ratio")]
    pub train: f64,
    /// Fraction of pairs assigned to the validation split.
    #[serde(default = "default_val_ratio")]
    pub val: f64,
}

impl SplitRatios {
    /// Error unless both fractions are non-negative and sum to at most 1.
    pub fn validate(self) -> FruitsetResult<()> {
        if self.train < 0.0 || self.val < 0.0 {
            return Err(FruitsetError::validation(
                "split ratios must be non-negative",
            ));
        }
        if self.train + self.val > 1.0 {
            return Err(FruitsetError::validation(
                "split ratios must sum to at most 1",
            ));
        }
        Ok(())
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: default_train_ratio(),
            val: default_val_ratio(),
        }
    }
}

fn default_train_ratio() -> f64 {
    0.7
}

fn default_val_ratio() -> f64 {
    0.15
}

fn default_chroma_key() -> [u8; 3] {
    [252, 180, 191]
}

fn default_max_splashes() -> u32 {
    5
}

/// Pipeline-wide configuration, usually loaded from a JSON settings file.
///
/// Every stage entry point takes the paths and values it needs from here
/// explicitly; nothing reads configuration ambiently.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Root directory holding `raw/`, `data/` and `YOLOformat/`.
    pub dataset_root: PathBuf,
    /// Directory holding `background.png`, the `*splash*` decals and the
    /// `foreground.png` terminal-layer placeholder.
    pub resource_dir: PathBuf,
    /// RGB color keyed out to transparency by the background segmenter.
    #[serde(default = "default_chroma_key")]
    pub chroma_key: [u8; 3],
    /// Upper bound (inclusive) on splashes per generated background.
    #[serde(default = "default_max_splashes")]
    pub max_splashes: u32,
    /// Train/val/test split fractions.
    #[serde(default)]
    pub split: SplitRatios,
    /// Seed for the pipeline RNG; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PipelineConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_path(path: &Path) -> FruitsetResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        config.split.validate()?;
        Ok(config)
    }

    /// Incoming raw capture directory.
    pub fn raw_dir(&self) -> PathBuf {
        self.dataset_root.join("raw")
    }

    /// Per-sample working directory.
    pub fn data_dir(&self) -> PathBuf {
        self.dataset_root.join("data")
    }

    /// Final YOLO-layout dataset directory.
    pub fn yolo_dir(&self) -> PathBuf {
        self.dataset_root.join("YOLOformat")
    }

    /// Placeholder image copied in for groups missing a terminal layer.
    pub fn placeholder_path(&self) -> PathBuf {
        self.resource_dir.join("foreground.png")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
