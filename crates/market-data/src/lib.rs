//! # Market Data Adapter
//!
//! Reads a single ticker's daily price history from a headered CSV file into
//! `DailyRecord`s, and writes the engine's output tables back out as delimited text.
//! This is the only crate in the workspace that touches the filesystem.

pub mod error;
pub mod loader;
pub mod writer;

pub use error::{DataError, Result};
pub use loader::PriceLoader;
pub use writer::{write_error_table, write_file, write_mean_relative, write_tail, write_weekly};
