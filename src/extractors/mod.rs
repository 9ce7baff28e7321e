// src/extractors/mod.rs
pub mod boundary;
pub mod dispatch;
pub mod format;
pub mod hierarchy;
pub mod segments;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use dispatch::{
    dispatch,
    dispatch_format,
    extractor_for,
    Extraction,
    HierarchyExtractor,
    SegmentExtractor,
    StructureDocument,
    StructureExtractor,
};
#[allow(unused_imports)]
pub use format::FormatTag;
