//! Reading and normalizing reference resources.
//!
//! Every resource, whatever its origin, is first turned into a DataFrame of
//! text columns and then normalized cell by cell:
//!
//! | Field             | SSA                       | WHO                         | HLD                     |
//! |-------------------|---------------------------|-----------------------------|-------------------------|
//! | country           | -                         | `country`, `country_code`   | `country`               |
//! | age               | `age`                     | `age`, `age_group` (opt.)   | `age`                   |
//! | sex               | -                         | `sex`, `sex_code`           | `sex`                   |
//! | year              | `year`                    | `year`                      | `year`, `year1`         |
//! | life expectancy   | `male_life_expectancy`, `female_life_expectancy` | `life_expectancy` | `life_expectancy`, `e(x)` |
//!
//! Header lookup is case-insensitive. Cells that cannot be coerced become
//! missing and the row is dropped.

use super::age_group::{parse_age, parse_whole_number};
use super::spreadsheet_helpers::read_spreadsheet;
use super::{LifeExpectancy, RefDataError, RefRow, RefTable, SourceKind};
use crate::helpers::text_column;
use log::debug;
use polars::prelude::*;
use std::path::Path;

/// WHO figures are life expectancy at birth unless an age band is given.
const WHO_DEFAULT_AGE: i64 = 1;

impl RefTable {
    /// Normalize an in-memory DataFrame into a reference table.
    ///
    /// Column types do not matter: every column is read as text and coerced,
    /// so a table read with inferred numeric types and one read as raw text
    /// normalize identically.
    ///
    /// # Errors
    /// - A required column is missing
    /// - No row survives normalization
    ///
    /// # Examples
    /// ```rust
    /// # use lost_years::prelude::*;
    /// use polars::prelude::*;
    /// let df = df! {
    ///     "Country" => ["USA", "USA"],
    ///     "Year1" => [2000, 2000],
    ///     "Sex" => [1, 2],
    ///     "Age" => [30, 30],
    ///     "e(x)" => [46.2, 51.0],
    /// }?;
    /// let table = RefTable::from_df(SourceKind::Hld, &df)?;
    /// assert_eq!(table.rows()[0].sex, Some("M"));
    /// # LostYearsResult::Ok(())
    /// ```
    pub fn from_df(source: SourceKind, df: &DataFrame) -> Result<Self, RefDataError> {
        let height = df.height();
        let rows = match source {
            SourceKind::Ssa => normalize_national(df)?,
            SourceKind::Who | SourceKind::Hld => normalize_stratified(source, df)?,
        };

        let dropped = height - rows.len();
        if dropped > 0 {
            debug!("{source}: dropped {dropped} of {height} rows with missing or invalid fields");
        }

        let table = Self::new(source, source.description().to_string(), rows);
        if table.is_empty() {
            return Err(RefDataError::Empty(source));
        }
        Ok(table)
    }

    /// Read a resource from disk, choosing the reader from the file extension.
    ///
    /// - `.csv`, `.csv.gz`, `.gz`: polars CSV reader (gzip is detected and decompressed)
    /// - `.xlsx`, `.xlsm`, `.xls`, `.ods`: first sheet via calamine
    ///
    /// # Errors
    /// - The file does not exist
    /// - The extension is not recognized
    /// - The file cannot be parsed, or fails [`RefTable::from_df`]
    pub fn from_path(source: SourceKind, path: &Path) -> Result<Self, RefDataError> {
        if !path.exists() {
            return Err(RefDataError::NotFound(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let df = if file_name.ends_with(".csv") || file_name.ends_with(".gz") {
            read_csv_as_text(path)?
        } else if [".xlsx", ".xlsm", ".xls", ".ods"]
            .iter()
            .any(|ext| file_name.ends_with(ext))
        {
            read_spreadsheet(path).map_err(|e| RefDataError::Spreadsheet(e.to_string()))?
        } else {
            return Err(RefDataError::UnsupportedFormat(path.to_path_buf()));
        };

        Self::from_df(source, &df)
    }
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

fn read_csv_as_text(path: &Path) -> PolarsResult<DataFrame> {
    // Schema inference disabled: all columns arrive as String
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn normalize_national(df: &DataFrame) -> Result<Vec<RefRow>, RefDataError> {
    let source = SourceKind::Ssa;
    let age_vec = required_text_column(df, source, "age", &["age"])?;
    let year_vec = required_text_column(df, source, "year", &["year"])?;
    let male_vec = required_text_column(
        df,
        source,
        "male_life_expectancy",
        &["male_life_expectancy"],
    )?;
    let female_vec = required_text_column(
        df,
        source,
        "female_life_expectancy",
        &["female_life_expectancy"],
    )?;

    let rows = (0..df.height())
        .filter_map(|i| {
            Some(RefRow {
                age: parse_age(age_vec[i].as_deref()?)?,
                year: parse_whole_number(year_vec[i].as_deref()?)?,
                sex: None,
                country: None,
                life_expectancy: LifeExpectancy::BySex {
                    male: parse_float(male_vec[i].as_deref()?)?,
                    female: parse_float(female_vec[i].as_deref()?)?,
                },
            })
        })
        .collect();

    Ok(rows)
}

fn normalize_stratified(source: SourceKind, df: &DataFrame) -> Result<Vec<RefRow>, RefDataError> {
    let (country_aliases, year_aliases, sex_aliases, age_aliases, le_aliases): (
        &[&str],
        &[&str],
        &[&str],
        &[&str],
        &[&str],
    ) = match source {
        SourceKind::Who => (
            &["country", "country_code"],
            &["year"],
            &["sex", "sex_code"],
            &["age", "age_group"],
            &["life_expectancy"],
        ),
        _ => (
            &["country"],
            &["year", "year1"],
            &["sex"],
            &["age"],
            &["life_expectancy", "e(x)"],
        ),
    };

    let country_vec = required_text_column(df, source, "country", country_aliases)?;
    let year_vec = required_text_column(df, source, "year", year_aliases)?;
    let sex_vec = required_text_column(df, source, "sex", sex_aliases)?;
    let le_vec = required_text_column(df, source, "life_expectancy", le_aliases)?;

    // Only WHO may omit ages
    let age_vec = match (find_column(df, age_aliases), source) {
        (Some(name), _) => Some(text_column(df, &name)?),
        (None, SourceKind::Who) => None,
        (None, _) => {
            return Err(RefDataError::MissingColumn {
                data_source: source,
                column: "age",
            });
        }
    };

    let codes = source.sex_codes();
    let rows = (0..df.height())
        .filter_map(|i| {
            let age = match &age_vec {
                Some(ages) => parse_age(ages[i].as_deref()?)?,
                None => WHO_DEFAULT_AGE,
            };
            let country = country_vec[i].as_deref().filter(|c| !c.is_empty())?;

            Some(RefRow {
                age,
                year: parse_whole_number(year_vec[i].as_deref()?)?,
                sex: Some(codes.normalize_reference(sex_vec[i].as_deref()?)?),
                country: Some(country.to_string()),
                life_expectancy: LifeExpectancy::Single(parse_float(le_vec[i].as_deref()?)?),
            })
        })
        .collect();

    Ok(rows)
}

fn required_text_column(
    df: &DataFrame,
    source: SourceKind,
    field: &'static str,
    aliases: &[&str],
) -> Result<Vec<Option<String>>, RefDataError> {
    let name = find_column(df, aliases).ok_or(RefDataError::MissingColumn {
        data_source: source,
        column: field,
    })?;
    Ok(text_column(df, &name)?)
}

/// First column whose name matches one of the aliases, ignoring case.
fn find_column(df: &DataFrame, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        df.get_column_names()
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(alias))
            .map(|name| name.to_string())
    })
}

fn parse_float(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
