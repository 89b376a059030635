//! Extraction of editions from the current-events portal markup.
//!
//! The pipeline, leaf-first:
//!
//! | Step | Module | Produces |
//! |------|--------|----------|
//! | Leaf discovery | [`leaves`] | leaf items of one top-level item |
//! | Record extraction | [`record`] | one [`EventRecord`](crate::models::EventRecord) per leaf |
//! | Section parsing | [`section`] | records of one list |
//! | Edition assembly | [`edition`] | one [`Edition`](crate::models::Edition) per day, plus headlines |
//!
//! Everything here is synchronous and reads the parsed document without
//! changing it. The layout is described by [`rules::ExtractRules`].

pub mod dom;
pub mod edition;
pub mod leaves;
pub mod record;
pub mod rules;
pub mod section;

pub use edition::{assemble_editions, count_days, extract_headlines};
pub use rules::ExtractRules;
