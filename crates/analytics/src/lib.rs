//! # Return Statistics Engine
//!
//! This crate computes descriptive statistics over the daily price history of a single
//! ticker: yearly return tables, the cent-digit distribution of opening prices with its
//! error against a uniform prior, and weekly mean/volatility aggregates.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files or
//!   terminals and depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `StatsEngine` takes a slice of `DailyRecord`s and
//!   produces report structs. Identical input always yields identical output.
//! - **Explicit Degenerate Cases:** Empty partitions and mismatched vectors are typed
//!   errors; a sigma that cannot be estimated is flagged on the row instead of becoming NaN.
//!
//! ## Public API
//!
//! - `StatsEngine`: The entry point wiring partitioning to each reduction.
//! - `YearPartition`, `DigitFrequency`: Intermediate views callers may inspect.
//! - Report structs (`MeanRelativeRow`, `TailRow`, `WeeklyAggregate`, ...).
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod digits;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod partition;
pub mod report;
pub mod returns;
pub mod stats;
pub mod weekly;

// Re-export the key components to create a clean, public-facing API.
pub use digits::{DigitFrequency, cent_digit, uniform_prior};
pub use engine::StatsEngine;
pub use error::AnalyticsError;
pub use metrics::{
    error_metrics, max_absolute_error, mean_absolute_error, median_absolute_error,
    root_mean_squared_error,
};
pub use partition::YearPartition;
pub use report::{
    BandSummary, ErrorMetric, ErrorMetrics, ErrorMetricsTable, MeanRelativeRow, SignCounts,
    TailRow, WeeklyAggregate, YearlyReport,
};
