pub mod error;
pub mod extractor;
pub mod loader;
pub mod report;
