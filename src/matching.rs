//! # Matching Query Records
//!
//! This module matches caller records against a reference life table and
//! merges the matches back onto the caller's DataFrame:
//!
//! - One generic matcher, configured per source by a [`spec::MatchSpec`]
//! - Nearest-value snapping for ages and years, case-insensitive equality for
//!   countries and sex codes
//! - Position-aligned merging that never drops or reorders rows
//!
//! ## Submodules
//! - [`spec`]: Key order, key kinds and output prefix for each source
//! - [`matcher`]: Query extraction and best-row selection
//! - [`merger`]: Appending `{tag}_*` columns to the query table
//! - [`sources`]: `lost_years_ssa`, `lost_years_who`, `lost_years_hld` and the generic `enrich`
//!
//! ## Usage Example
//! ```rust
//! # use lost_years::prelude::*;
//! use polars::prelude::*;
//! let table = refdf!(SourceKind::Who;
//!     "country_code" => ["USA", "USA", "CAN"],
//!     "year" => [2019, 2019, 2019],
//!     "sex_code" => ["MLE", "FMLE", "MLE"],
//!     "life_expectancy" => [76.3, 81.4, 80.4],
//! )?;
//! let loader = RefTableLoader::preloaded(table);
//!
//! let people = df! {
//!     "country" => ["usa", "ZZZ"],
//!     "age" => [40, 40],
//!     "sex" => ["female", "M"],
//!     "year" => [2020, 2020],
//! }?;
//! let out = lost_years_who().df(&people).loader(&loader).call()?;
//!
//! let le = out.column("who_life_expectancy")?.f64()?;
//! assert_eq!(le.get(0), Some(81.4));
//! assert_eq!(le.get(1), None);
//! # LostYearsResult::Ok(())
//! ```
//!
//! ## Notes
//! - When several rows survive every key, the first one in table order is used.
//! - Reference tables are loaded once per [`crate::ref_table::loader::RefTableLoader`].

// Module structure
pub mod matcher;
pub mod merger;
pub mod sources;
pub mod spec;
