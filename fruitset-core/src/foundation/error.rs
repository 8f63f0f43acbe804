use std::path::PathBuf;

/// Convenience result type used across Fruitset.
pub type FruitsetResult<T> = Result<T, FruitsetError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Malformed animation groups, unresolved class names and asymmetric bomb
/// captures are deliberately not represented here: those are per-item
/// conditions the stages log and count rather than abort on.
#[derive(thiserror::Error, Debug)]
pub enum FruitsetError {
    /// A stage input or output directory does not exist.
    #[error("missing directory: '{}'", .0.display())]
    MissingDirectory(PathBuf),

    /// A required pipeline asset (placeholder, background, splashes) is absent.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// Invalid configuration or capture data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FruitsetError {
    /// Build a [`FruitsetError::MissingDirectory`] value.
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory(path.into())
    }

    /// Build a [`FruitsetError::MissingResource`] value.
    pub fn missing_resource(msg: impl Into<String>) -> Self {
        Self::MissingResource(msg.into())
    }

    /// Build a [`FruitsetError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
