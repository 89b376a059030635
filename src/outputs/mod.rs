//! Output generation.
//!
//! - [`json`]: writes the extracted page for the presentation layer

pub mod json;
