//! Persistence sinks for a finished collection.
//!
//! Both sinks are write-once. A failure here is reported to the caller but
//! never invalidates the in-memory collection it was given.

pub mod categorized;
pub mod error;
pub mod tabular;

pub use categorized::{file_name, render_item, write_categorized, SEPARATOR_WIDTH};
pub use error::ExportError;
pub use tabular::{read_items_csv, write_items_csv, TabularRow};
