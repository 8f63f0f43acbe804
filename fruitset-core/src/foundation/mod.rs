pub mod capture;
pub mod classes;
pub mod error;
pub mod fs;
