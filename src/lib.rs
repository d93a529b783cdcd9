//! # Lost Years
//!
//! Append a matched life-expectancy estimate to per-person demographic records.
//!
//! ## Features
//! - **Three reference tables**: US SSA period life table, WHO life expectancy, Human Life-Table Database (HLD)
//! - **Approximate matching**: ages and years snap to the nearest table entry; countries and sex match case-insensitively
//! - **DataFrame in, DataFrame out**: results are appended as `{tag}_*` columns, row count and order untouched
//! - **Load once**: each reference table is read and normalized on first use, then cached
//! - **Forgiving**: missing columns, missing resources and unmatched rows degrade to unchanged or null output with a log line
//!
//! ## Quick Start
//!
//! ```rust
//! use lost_years::prelude::*;
//! use polars::prelude::*;
//!
//! // Normally loaded from data/ssa/ssa.csv; injected here
//! let table = refdf!(SourceKind::Ssa;
//!     "age" => [30, 40],
//!     "year" => [2020, 2020],
//!     "male_life_expectancy" => [50.0, 40.7],
//!     "female_life_expectancy" => [55.0, 45.3],
//! )?;
//! let loader = RefTableLoader::preloaded(table);
//!
//! let people = df! {
//!     "age" => [31, 42],
//!     "sex" => ["M", "F"],
//!     "year" => [2019, 2021],
//! }?;
//!
//! let out = lost_years_ssa().df(&people).loader(&loader).call()?;
//! println!("{out}");
//! # LostYearsResult::Ok(())
//! ```
//!
//! ## Sources
//!
//! | Function          | Matches on                  | Appends                                         |
//! |-------------------|-----------------------------|-------------------------------------------------|
//! | `lost_years_ssa`  | age, year (sex picks column)| `ssa_age`, `ssa_year`, `ssa_life_expectancy`    |
//! | `lost_years_who`  | country, age, year, sex     | `who_age`, `who_country`, `who_sex`, `who_year`, `who_life_expectancy` |
//! | `lost_years_hld`  | country, sex, age, year     | `hld_age`, `hld_country`, `hld_sex`, `hld_year`, `hld_life_expectancy` |
//!
//! ## Notes
//! - Column names are configurable through [`params::ColumnConfig`]
//! - Resources are looked up under `$LOST_YEARS_DATA_DIR` (default: `data/` in the crate root)
//! - Logging goes through the `log` facade; install any logger to see it

pub type LostYearsResult<T> = Result<T, Box<dyn std::error::Error>>;
pub mod helpers;
#[macro_use]
pub mod macros;
pub mod matching;
pub mod params;
pub mod prelude;
pub mod ref_table;
