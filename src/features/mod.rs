//! Feature modules - Input and output surfaces
//!
//! This module contains the crate's exchange surfaces:
//! - Markdown pipe-table reading
//! - Delimited / row-major / embedding-text export

pub mod export;
pub mod markdown;

// Re-export commonly used items
pub use export::{
    block_to_delimited, block_to_embedding_text, block_to_row_major, consolidated_to_delimited,
    consolidated_to_embedding_text, consolidated_to_row_major,
};
pub use markdown::parse_markdown_table;
