//! Cleaning and relational decomposition of raw iTunes search results.
//!
//! Pure synchronous code over [`tunecat_core::Frame`], except for
//! [`load::load_catalog`], which drives any [`tunecat_core::store::CatalogStore`].
//!
//! # Quick start
//!
//! ```no_run
//! use tunecat_core::Frame;
//! use tunecat_transform::{TransformConfig, clean_master, decompose::decompose_master};
//!
//! let raw = Frame::new(["trackName", "trackPrice"]);
//! let config = TransformConfig::default();
//! let master = clean_master(raw, &config).unwrap();
//! let tables = decompose_master(master, &config.conflict_policy).unwrap();
//! println!("{} tracks", tables.tracks.len());
//! ```

pub mod coerce;
pub mod columns;
pub mod decompose;
pub mod error;
pub mod identity;
pub mod load;
pub mod nulls;
pub mod pipeline;
pub mod price;
pub mod report;
pub mod sanitize;

pub use error::{Error, Result};
pub use pipeline::{TransformConfig, clean_master};
