pub mod groups;
pub mod relocate;
