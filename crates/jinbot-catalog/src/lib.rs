//! # JinBot Catalog
//! Content catalog scanning and next-item rotation selection.

pub mod catalog;
pub mod rotation;

pub use catalog::MemeCatalog;
pub use rotation::RotationSelector;
