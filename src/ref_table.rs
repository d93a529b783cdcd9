//! # Reference Life Tables (RefTable)
//!
//! Load, normalize and cache the three reference life-table datasets that
//! query records are matched against.
//!
//! This module provides the `RefTable` struct and related types:
//! - Source selection ([`SourceKind`]: SSA, WHO, HLD)
//! - Normalized rows ([`RefRow`]) with integer ages and years, two-valued sex codes
//! - Per-source sex conventions ([`SexCodes`])
//! - A load-once cache ([`loader::RefTableLoader`])
//!
//! ## Quick Start
//! ```rust
//! # use lost_years::prelude::*;
//! use polars::prelude::*;
//! let df = df! {
//!     "age" => ["30", "31"],
//!     "year" => ["2020", "2020"],
//!     "male_life_expectancy" => ["48.1", "47.2"],
//!     "female_life_expectancy" => ["52.3", "51.4"],
//! }?;
//! let table = RefTable::from_df(SourceKind::Ssa, &df)?;
//! assert_eq!(table.len(), 2);
//! # LostYearsResult::Ok(())
//! ```
//!
//! ## See Also
//! - [`crate::ref_table::ref_data`] for resource reading and normalization rules
//! - [`crate::matching`] for matching query records against a table

// Create a structure for the module
mod age_group;
pub mod loader;
pub mod ref_data;
mod spreadsheet_helpers;

pub use self::age_group::{convert_age_group, parse_age};

use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

// ===============================================
// DATA SOURCES
// ===============================================

/// The reference datasets a query can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// US Social Security Administration period life table (national).
    Ssa,

    /// WHO Global Health Observatory life expectancy (global, country-stratified).
    Who,

    /// Human Life-Table Database (historical, multi-country).
    Hld,
}

impl SourceKind {
    /// Prefix of the columns this source appends to a query table.
    pub fn tag(&self) -> &'static str {
        match self {
            SourceKind::Ssa => "ssa",
            SourceKind::Who => "who",
            SourceKind::Hld => "hld",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SourceKind::Ssa => "SSA period life table",
            SourceKind::Who => "WHO life expectancy",
            SourceKind::Hld => "Human Life-Table Database",
        }
    }

    /// Sex coding used by the source's rows.
    pub fn sex_codes(&self) -> SexCodes {
        match self {
            SourceKind::Who => SexCodes {
                male: "MLE",
                female: "FMLE",
            },
            SourceKind::Ssa | SourceKind::Hld => SexCodes {
                male: "M",
                female: "F",
            },
        }
    }

    /// Location of the resource relative to the data directory.
    pub fn default_relative_path(&self) -> PathBuf {
        match self {
            SourceKind::Ssa => PathBuf::from("ssa").join("ssa.csv"),
            SourceKind::Who => PathBuf::from("who").join("who.csv.gz"),
            SourceKind::Hld => PathBuf::from("hld").join("hld.csv.gz"),
        }
    }

    /// Whether rows carry a country and a sex code (WHO, HLD) or one life
    /// expectancy per sex (SSA).
    pub fn is_stratified(&self) -> bool {
        !matches!(self, SourceKind::Ssa)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag().to_uppercase())
    }
}

// ===============================================
// SEX CODES
// ===============================================

/// Two-valued sex coding of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SexCodes {
    pub male: &'static str,
    pub female: &'static str,
}

impl SexCodes {
    /// Classify a query value. Recognized male tokens map to the male code and
    /// everything else, unknown tokens included, maps to the female code.
    pub fn classify(&self, raw: &str) -> &'static str {
        let token = raw.trim().to_lowercase();
        let is_male = matches!(token.as_str(), "m" | "male" | "1")
            || token == self.male.to_lowercase();
        if is_male { self.male } else { self.female }
    }

    /// Normalize a reference cell. Only the two codes of the source (and the
    /// numeric `1`/`2` coding) are accepted; anything else is missing.
    pub fn normalize_reference(&self, raw: &str) -> Option<&'static str> {
        let token = raw.trim();
        if token.eq_ignore_ascii_case(self.male) || token == "1" {
            Some(self.male)
        } else if token.eq_ignore_ascii_case(self.female) || token == "2" {
            Some(self.female)
        } else {
            None
        }
    }
}

// ===============================================
// NORMALIZED ROWS
// ===============================================

/// Life expectancy carried by a reference row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifeExpectancy {
    /// National tables hold both sexes on one row.
    BySex { male: f64, female: f64 },

    /// Stratified tables hold one value per row; sex is a row key.
    Single(f64),
}

impl LifeExpectancy {
    /// Read the value for a normalized sex code.
    pub fn for_sex(&self, is_male: bool) -> f64 {
        match *self {
            LifeExpectancy::BySex { male, female } => {
                if is_male {
                    male
                } else {
                    female
                }
            }
            LifeExpectancy::Single(value) => value,
        }
    }
}

/// One normalized life-table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RefRow {
    pub age: i64,
    pub year: i64,
    pub sex: Option<&'static str>,
    pub country: Option<String>,
    pub life_expectancy: LifeExpectancy,
}

// ===============================================
// REFERENCE TABLE
// ===============================================

/// A normalized, de-duplicated reference table for one source.
#[derive(Debug, Clone)]
pub struct RefTable {
    pub source: SourceKind,
    pub description: String,
    rows: Vec<RefRow>,
}

impl RefTable {
    /// Build a table from normalized rows.
    ///
    /// Rows sharing the same (age, sex, year, country) combination are
    /// collapsed onto the first one encountered.
    pub fn new(source: SourceKind, description: String, rows: Vec<RefRow>) -> Self {
        let mut seen = HashSet::with_capacity(rows.len());
        let rows = rows
            .into_iter()
            .filter(|row| seen.insert((row.age, row.sex, row.year, row.country.clone())))
            .collect();

        Self {
            source,
            description,
            rows,
        }
    }

    pub fn rows(&self) -> &[RefRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct countries (0 for national tables).
    pub fn country_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.country.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Earliest and latest year in the table.
    pub fn year_range(&self) -> Option<(i64, i64)> {
        let min = self.rows.iter().map(|row| row.year).min()?;
        let max = self.rows.iter().map(|row| row.year).max()?;
        Some((min, max))
    }

    /// Expose the normalized table as a DataFrame.
    ///
    /// SSA: `age`, `year`, `male_life_expectancy`, `female_life_expectancy`.
    /// WHO/HLD: `country`, `age`, `sex`, `year`, `life_expectancy`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let age_vec: Vec<i64> = self.rows.iter().map(|row| row.age).collect();
        let year_vec: Vec<i64> = self.rows.iter().map(|row| row.year).collect();

        if !self.source.is_stratified() {
            let male_vec: Vec<f64> = self
                .rows
                .iter()
                .map(|row| row.life_expectancy.for_sex(true))
                .collect();
            let female_vec: Vec<f64> = self
                .rows
                .iter()
                .map(|row| row.life_expectancy.for_sex(false))
                .collect();

            return DataFrame::new(vec![
                Series::new("age".into(), age_vec).into_column(),
                Series::new("year".into(), year_vec).into_column(),
                Series::new("male_life_expectancy".into(), male_vec).into_column(),
                Series::new("female_life_expectancy".into(), female_vec).into_column(),
            ]);
        }

        let country_vec: Vec<Option<String>> =
            self.rows.iter().map(|row| row.country.clone()).collect();
        let sex_vec: Vec<Option<&str>> = self.rows.iter().map(|row| row.sex).collect();
        let le_vec: Vec<f64> = self
            .rows
            .iter()
            .map(|row| row.life_expectancy.for_sex(true))
            .collect();

        DataFrame::new(vec![
            Series::new("country".into(), country_vec).into_column(),
            Series::new("age".into(), age_vec).into_column(),
            Series::new("sex".into(), sex_vec).into_column(),
            Series::new("year".into(), year_vec).into_column(),
            Series::new("life_expectancy".into(), le_vec).into_column(),
        ])
    }
}

// ===============================================
// ERRORS
// ===============================================

/// Reasons a reference resource cannot produce a usable table.
#[derive(Debug, thiserror::Error)]
pub enum RefDataError {
    #[error("reference resource not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported reference resource format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{data_source} reference data has no `{column}` column")]
    MissingColumn {
        data_source: SourceKind,
        column: &'static str,
    },

    #[error("{0} reference data has no usable rows")]
    Empty(SourceKind),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn hld_row(country: &str, sex: &'static str, age: i64, year: i64, le: f64) -> RefRow {
        RefRow {
            age,
            year,
            sex: Some(sex),
            country: Some(country.to_string()),
            life_expectancy: LifeExpectancy::Single(le),
        }
    }

    #[test]
    fn test_sex_classify_male_tokens() {
        let codes = SourceKind::Hld.sex_codes();
        for token in ["M", "m", "Male", "male", "1", " MALE "] {
            assert_eq!(codes.classify(token), "M", "token {token:?}");
        }
    }

    #[test]
    fn test_sex_classify_is_total() {
        let codes = SourceKind::Who.sex_codes();
        assert_eq!(codes.classify("mle"), "MLE");
        for token in ["F", "female", "2", "", "x", "unknown", "мужчина"] {
            assert_eq!(codes.classify(token), "FMLE", "token {token:?}");
        }
    }

    #[test]
    fn test_sex_normalize_reference() {
        let codes = SourceKind::Hld.sex_codes();
        assert_eq!(codes.normalize_reference("1"), Some("M"));
        assert_eq!(codes.normalize_reference("2"), Some("F"));
        assert_eq!(codes.normalize_reference("f"), Some("F"));
        assert_eq!(codes.normalize_reference("3"), None);

        let codes = SourceKind::Who.sex_codes();
        assert_eq!(codes.normalize_reference("FMLE"), Some("FMLE"));
        assert_eq!(codes.normalize_reference("BTSX"), None);
    }

    #[test]
    fn test_ref_table_deduplicates_keeping_first() {
        let rows = vec![
            hld_row("USA", "M", 30, 2000, 45.0),
            hld_row("USA", "M", 30, 2000, 99.0),
            hld_row("USA", "F", 30, 2000, 50.0),
        ];
        let table = RefTable::new(SourceKind::Hld, "test".into(), rows);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].life_expectancy, LifeExpectancy::Single(45.0));
        assert_eq!(table.rows()[1].sex, Some("F"));
    }

    #[test]
    fn test_ref_table_summary() {
        let rows = vec![
            hld_row("USA", "M", 30, 1990, 45.0),
            hld_row("CAN", "M", 30, 2010, 46.0),
            hld_row("USA", "F", 30, 2000, 50.0),
        ];
        let table = RefTable::new(SourceKind::Hld, "test".into(), rows);

        assert_eq!(table.country_count(), 2);
        assert_eq!(table.year_range(), Some((1990, 2010)));
    }

    #[test]
    fn test_to_dataframe_national_layout() {
        let rows = vec![RefRow {
            age: 30,
            year: 2020,
            sex: None,
            country: None,
            life_expectancy: LifeExpectancy::BySex {
                male: 50.0,
                female: 55.0,
            },
        }];
        let table = RefTable::new(SourceKind::Ssa, "test".into(), rows);
        let df = table.to_dataframe().unwrap();

        assert_eq!(
            df.get_column_names(),
            vec!["age", "year", "male_life_expectancy", "female_life_expectancy"]
        );
        assert_eq!(df.height(), 1);
    }
}
