//! Core types and trait definitions for the tunecat catalog pipeline.
//!
//! No HTTP, CSV or database code lives here. Every other crate of the
//! workspace depends on this one.

pub mod catalog;
pub mod error;
pub mod frame;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use frame::{Frame, Row};
pub use value::Value;
