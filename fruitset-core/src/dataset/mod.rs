pub mod manifest;
pub mod organize;
