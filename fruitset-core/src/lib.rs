//! Fruitset builds synthetic object-detection datasets from per-frame game
//! sprite captures.
//!
//! The input is a flat directory of capture files named
//! `<animation>-<sequence>-<class>.png`, where each numbered capture adds one
//! object relative to the previous one and a trailing `x` capture holds the
//! already-transparent full frame. Fruitset turns those into YOLO training
//! data in five on-disk stages plus a final reorganization:
//!
//! 1. **Sort**: validate sequence numbering per animation and move each
//!    accepted group into its own `img_<n>` sample folder
//! 2. **Segment**: key the capture background color out to transparency
//! 3. **Mask**: frame-difference consecutive captures into one alpha mask
//!    per introduced object
//! 4. **Composite**: blend all captures over a randomized splash background
//!    into the sample's training image
//! 5. **Bbox**: convert mask extents into normalized YOLO label lines
//! 6. **Organize**: shuffle, split train/val/test and emit `data.yaml`
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit configuration**: every stage takes a [`PipelineConfig`]-derived
//!   path or value; there is no ambient settings lookup.
//! - **Seedable randomness**: splash placement, recoloring and the dataset
//!   shuffle all draw from a caller-supplied [`rand::Rng`].
//! - **Stages are plain directory transforms**: each one can be run (and
//!   tested) on its own against a synthetic fixture tree.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod background;
mod bbox;
mod composite;
mod dataset;
mod foundation;
mod mask;
mod pipeline;
mod segment;
mod sort;
mod visualize;

pub use background::generator::BackgroundGen;
pub use bbox::extract::{BboxSummary, extract_bboxes, extract_sample_bboxes};
pub use composite::blend::{CompositeSummary, composite_sample, composite_samples};
pub use dataset::manifest::write_manifest;
pub use dataset::organize::{OrganizeSummary, organize_dataset};
pub use foundation::capture::{CaptureName, Sequence};
pub use foundation::classes::{CLASS_NAMES, ClassVariant, SpriteClass, class_id};
pub use foundation::error::{FruitsetError, FruitsetResult};
pub use mask::diff::{MaskSummary, generate_masks, generate_sample_masks};
pub use pipeline::config::{PipelineConfig, SplitRatios};
pub use pipeline::run::{PipelineOpts, PipelineSummary, run_pipeline, seeded_rng};
pub use segment::chroma::{SegmentSummary, segment_samples};
pub use sort::groups::{AnimationGroup, GroupingOutcome, group_captures};
pub use sort::relocate::{SortOpts, SortSummary, sort_raw_captures};
pub use visualize::overlay::{VisualizeSummary, visualize_samples};
