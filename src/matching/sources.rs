use super::matcher::{Matcher, extract_queries};
use super::merger::merge_results;
use super::spec::MatchSpec;
use crate::LostYearsResult;
use crate::helpers::column_exists;
use crate::params::ColumnConfig;
use crate::ref_table::SourceKind;
use crate::ref_table::loader::{RefTableLoader, default_loader};
use bon::builder;
use log::{debug, warn};
use polars::prelude::*;

// =======================================
// PUBLIC FUNCTIONS
// =======================================

/// Enrich `df` with life expectancy from the table served by `loader`.
///
/// - A mapped column missing from `df` aborts the whole operation: a warning
///   is logged and `df` is returned unchanged.
/// - An empty `df` is returned unchanged.
/// - When the loader has no table (missing or malformed resource) every row
///   gets nulls in the appended columns.
///
/// # Errors
/// - `cols` maps a field to an empty column name
/// - `loader` serves a different source than `spec`
pub fn enrich(
    df: &DataFrame,
    loader: &RefTableLoader,
    spec: &MatchSpec,
    cols: &ColumnConfig,
) -> LostYearsResult<DataFrame> {
    cols.validate_all()
        .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

    if loader.source() != spec.source {
        return Err(format!(
            "{} loader cannot serve {} matching",
            loader.source(),
            spec.source
        )
        .into());
    }

    // All-or-nothing precondition
    for &field in &spec.required {
        let name = cols.column(field);
        if !column_exists(df, name) {
            warn!("No column `{name}` in the DataFrame");
            return Ok(df.clone());
        }
    }

    if df.height() == 0 {
        return Ok(df.clone());
    }

    let queries = extract_queries(df, cols, &spec.required)?;
    let results = Matcher::new(spec, loader.table()).match_all(&queries);

    let matched = results.iter().filter(|r| r.is_some()).count();
    debug!("{}: matched {matched} of {} rows", spec.source, results.len());

    Ok(merge_results(df, spec, &results)?)
}

/// Append SSA life expectancy by age, sex and year.
///
/// Adds `ssa_age`, `ssa_year`, `ssa_life_expectancy`. Sex picks the male or
/// female column of the matched row.
///
/// # Example
/// ```rust
/// # use lost_years::prelude::*;
/// use polars::prelude::*;
/// let table = refdf!(SourceKind::Ssa;
///     "age" => [30, 31],
///     "year" => [2020, 2020],
///     "male_life_expectancy" => [50.0, 49.1],
///     "female_life_expectancy" => [55.0, 54.2],
/// )?;
/// let loader = RefTableLoader::preloaded(table);
///
/// let people = df! {
///     "age" => [31, 30],
///     "sex" => ["M", "F"],
///     "year" => [2019, 2021],
/// }?;
/// let out = lost_years_ssa().df(&people).loader(&loader).call()?;
/// let le = out.column("ssa_life_expectancy")?.f64()?;
/// assert_eq!(le.get(0), Some(49.1));
/// assert_eq!(le.get(1), Some(55.0));
/// # LostYearsResult::Ok(())
/// ```
#[builder]
pub fn lost_years_ssa(
    df: &DataFrame,
    cols: Option<ColumnConfig>,
    loader: Option<&RefTableLoader>,
) -> LostYearsResult<DataFrame> {
    let loader = loader.unwrap_or_else(|| default_loader(SourceKind::Ssa));
    enrich(df, loader, &MatchSpec::ssa(), &cols.unwrap_or_default())
}

/// Append WHO life expectancy by country, age, year and sex.
///
/// Adds `who_age`, `who_country`, `who_sex`, `who_year`,
/// `who_life_expectancy`. Countries must match exactly (case-insensitive).
#[builder]
pub fn lost_years_who(
    df: &DataFrame,
    cols: Option<ColumnConfig>,
    loader: Option<&RefTableLoader>,
) -> LostYearsResult<DataFrame> {
    let loader = loader.unwrap_or_else(|| default_loader(SourceKind::Who));
    enrich(df, loader, &MatchSpec::who(), &cols.unwrap_or_default())
}

/// Append HLD life expectancy by country, sex, age and year.
///
/// Adds `hld_age`, `hld_country`, `hld_sex`, `hld_year`,
/// `hld_life_expectancy`. When no country matches exactly, the first
/// countries whose code contains the query value are used instead.
#[builder]
pub fn lost_years_hld(
    df: &DataFrame,
    cols: Option<ColumnConfig>,
    loader: Option<&RefTableLoader>,
) -> LostYearsResult<DataFrame> {
    let loader = loader.unwrap_or_else(|| default_loader(SourceKind::Hld));
    enrich(df, loader, &MatchSpec::hld(), &cols.unwrap_or_default())
}
