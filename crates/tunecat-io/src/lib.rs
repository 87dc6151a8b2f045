//! File and network edges of the tunecat pipeline.
//!
//! - [`scrape`]: daily iTunes Search API extraction into a dated CSV file.
//! - [`raw`]: reading every raw CSV file back into one [`tunecat_core::Frame`].
//! - [`snapshot`]: JSON snapshots of the master table and the normalized
//!   tables, handed from `transform` to `load`.

pub mod client;
pub mod error;
pub mod raw;
pub mod scrape;
pub mod snapshot;
pub mod terms;

pub use error::{Error, Result};
