use super::spec::{KeyKind, KeyRule, MatchSpec};
use crate::helpers::{closest, float_column, text_column};
use crate::params::{ColumnConfig, QueryField};
use crate::ref_table::{RefRow, RefTable, SourceKind};
use bon::Builder;
use polars::prelude::*;

// ===============================================
// QUERY RECORD
// ===============================================

/// One person to look up. Numeric fields are `f64` so fractional ages and
/// years snap to the nearest table entry.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct QueryRecord {
    pub age: Option<f64>,
    #[builder(into)]
    pub sex: Option<String>,
    pub year: Option<f64>,
    #[builder(into)]
    pub country: Option<String>,
}

impl QueryRecord {
    fn numeric(&self, field: QueryField) -> Option<f64> {
        match field {
            QueryField::Age => self.age,
            QueryField::Year => self.year,
            QueryField::Sex | QueryField::Country => None,
        }
    }
}

/// Read one [`QueryRecord`] per row; fields outside `fields` stay `None`.
pub fn extract_queries(
    df: &DataFrame,
    cols: &ColumnConfig,
    fields: &[QueryField],
) -> PolarsResult<Vec<QueryRecord>> {
    let mut queries = vec![QueryRecord::default(); df.height()];

    for &field in fields {
        let name = cols.column(field);
        match field {
            QueryField::Age | QueryField::Year => {
                for (query, value) in queries.iter_mut().zip(float_column(df, name)?) {
                    match field {
                        QueryField::Age => query.age = value,
                        _ => query.year = value,
                    }
                }
            }
            QueryField::Sex | QueryField::Country => {
                for (query, value) in queries.iter_mut().zip(text_column(df, name)?) {
                    match field {
                        QueryField::Sex => query.sex = value,
                        _ => query.country = value,
                    }
                }
            }
        }
    }

    Ok(queries)
}

// ===============================================
// MATCH RESULT
// ===============================================

/// The reference entry chosen for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeExpectancyResult {
    pub data_source: SourceKind,
    pub source_age: i64,
    pub source_year: i64,
    pub life_expectancy: f64,
    /// Sex code of the matched row (stratified sources only).
    pub source_sex: Option<&'static str>,
    /// Country of the matched row (stratified sources only).
    pub source_country: Option<String>,
}

impl LifeExpectancyResult {
    fn from_row(source: SourceKind, row: &RefRow, is_male: bool) -> Self {
        Self {
            data_source: source,
            source_age: row.age,
            source_year: row.year,
            life_expectancy: row.life_expectancy.for_sex(is_male),
            source_sex: row.sex,
            source_country: row.country.clone(),
        }
    }
}

// ===============================================
// MATCHER
// ===============================================

/// Selects the single best reference row for a query.
///
/// Keys are applied in the order given by the [`MatchSpec`]; each one only
/// searches the rows that survived the previous keys. The first surviving row
/// wins. A matcher without a table never matches.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    spec: &'a MatchSpec,
    table: Option<&'a RefTable>,
}

impl<'a> Matcher<'a> {
    pub fn new(spec: &'a MatchSpec, table: Option<&'a RefTable>) -> Self {
        Self { spec, table }
    }

    /// Match one query record.
    ///
    /// ```rust
    /// # use lost_years::prelude::*;
    /// use polars::prelude::*;
    /// let df = df! {
    ///     "age" => [30, 40],
    ///     "year" => [2020, 2020],
    ///     "male_life_expectancy" => [50.0, 40.0],
    ///     "female_life_expectancy" => [55.0, 45.0],
    /// }?;
    /// let table = RefTable::from_df(SourceKind::Ssa, &df)?;
    /// let spec = MatchSpec::ssa();
    /// let query = QueryRecord::builder().age(33.0).sex("F").year(2019.0).build();
    ///
    /// let result = Matcher::new(&spec, Some(&table)).lookup(&query).unwrap();
    /// assert_eq!(result.source_age, 30);
    /// assert_eq!(result.life_expectancy, 55.0);
    /// # LostYearsResult::Ok(())
    /// ```
    pub fn lookup(&self, query: &QueryRecord) -> Option<LifeExpectancyResult> {
        let table = self.table?;
        let codes = self.spec.source.sex_codes();
        let sex_code = codes.classify(query.sex.as_deref().unwrap_or_default());

        let mut candidates: Vec<&RefRow> = table.rows().iter().collect();
        for rule in &self.spec.keys {
            candidates = narrow(candidates, rule, query, sex_code)?;
        }

        let row = candidates.first()?;
        Some(LifeExpectancyResult::from_row(
            self.spec.source,
            row,
            sex_code == codes.male,
        ))
    }

    /// Match every query, keeping results aligned with the input positions.
    pub fn match_all(&self, queries: &[QueryRecord]) -> Vec<Option<LifeExpectancyResult>> {
        queries.iter().map(|query| self.lookup(query)).collect()
    }
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

/// Apply one key. `None` when no candidate survives or the query has no value
/// for the key.
fn narrow<'r>(
    candidates: Vec<&'r RefRow>,
    rule: &KeyRule,
    query: &QueryRecord,
    sex_code: &str,
) -> Option<Vec<&'r RefRow>> {
    let survivors: Vec<&RefRow> = match rule.kind {
        KeyKind::Nearest => {
            let target = query.numeric(rule.field)?;
            let best = closest(
                candidates.iter().filter_map(|row| numeric_key(row, rule.field)),
                target,
            )?;
            candidates
                .into_iter()
                .filter(|row| numeric_key(row, rule.field) == Some(best))
                .collect()
        }
        KeyKind::Exact | KeyKind::ExactOrSubstring => {
            let wanted = match rule.field {
                QueryField::Sex => sex_code.to_uppercase(),
                _ => query
                    .country
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())?
                    .to_uppercase(),
            };
            let upper = |row: &RefRow| text_key(row, rule.field).map(str::to_uppercase);

            let exact: Vec<&RefRow> = candidates
                .iter()
                .copied()
                .filter(|row| upper(*row).as_deref() == Some(wanted.as_str()))
                .collect();

            if exact.is_empty() && rule.kind == KeyKind::ExactOrSubstring {
                candidates
                    .into_iter()
                    .filter(|row| upper(*row).is_some_and(|value| value.contains(&wanted)))
                    .collect()
            } else {
                exact
            }
        }
    };

    (!survivors.is_empty()).then_some(survivors)
}

fn numeric_key(row: &RefRow, field: QueryField) -> Option<i64> {
    match field {
        QueryField::Age => Some(row.age),
        QueryField::Year => Some(row.year),
        QueryField::Sex | QueryField::Country => None,
    }
}

fn text_key(row: &RefRow, field: QueryField) -> Option<&str> {
    match field {
        QueryField::Sex => row.sex,
        QueryField::Country => row.country.as_deref(),
        QueryField::Age | QueryField::Year => None,
    }
}
