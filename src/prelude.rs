//! # Lost Years Prelude
//!
//! Conveniently re-exports the most common types and functions for enriching records.
//! Import this module to access all primary features with a single `use` statement.
//!
//! ## Example
//!
//! ```rust
//! # use lost_years::prelude::*;
//! use polars::prelude::*;
//! let table = refdf!(SourceKind::Hld;
//!     "Country" => ["SWE", "SWE"],
//!     "Year1" => [1900, 1900],
//!     "Sex" => [1, 2],
//!     "Age" => [30, 30],
//!     "e(x)" => [35.1, 37.0],
//! )?;
//! let loader = RefTableLoader::preloaded(table);
//! let people = df! {
//!     "nation" => ["swe"],
//!     "age" => [32],
//!     "sex" => ["m"],
//!     "year" => [1905],
//! }?;
//! let cols = ColumnConfig::builder().country("nation").build();
//! let out = lost_years_hld().df(&people).cols(cols).loader(&loader).call()?;
//! assert_eq!(out.column("hld_life_expectancy")?.f64()?.get(0), Some(35.1));
//! # LostYearsResult::Ok(())
//! ```

// Package Result type
pub use crate::LostYearsResult;

// Table construction macro
pub use crate::refdf;

// Per-source entry points and the generic one
pub use crate::matching::sources::{enrich, lost_years_hld, lost_years_ssa, lost_years_who};

// Matching building blocks
pub use crate::matching::matcher::{LifeExpectancyResult, Matcher, QueryRecord};
pub use crate::matching::spec::{KeyKind, KeyRule, MatchSpec};

// Configuration
pub use crate::params::{ColumnConfig, QueryField};

// Reference tables and their loaders
pub use crate::ref_table::loader::{DataSourceConfig, RefTableLoader, default_loader};
pub use crate::ref_table::{LifeExpectancy, RefDataError, RefRow, RefTable, SexCodes, SourceKind};

// Most commonly used Polars types for working with query tables
pub use polars::prelude::{DataFrame, PolarsError, PolarsResult, Series};
