//! Data model for extracted document content.
//!
//! These types carry content between the extraction sources and the
//! serialization sinks: per-page text, detected tables, embedded images,
//! and document metadata.

mod image;
mod metadata;
mod page;
mod table;

pub use image::ExtractedImage;
pub use metadata::Metadata;
pub use page::PageContent;
pub use table::ExtractedTable;
