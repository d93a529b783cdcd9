use super::matcher::LifeExpectancyResult;
use super::spec::MatchSpec;
use polars::prelude::*;

/// Append the matched fields to `df` as `{tag}_*` columns.
///
/// `results[i]` belongs to row `i`. Rows without a match get nulls, so the
/// row count and order of `df` are untouched. An empty `df` is returned as
/// is, without new columns.
///
/// # Errors
/// - `results` and `df` differ in length
pub fn merge_results(
    df: &DataFrame,
    spec: &MatchSpec,
    results: &[Option<LifeExpectancyResult>],
) -> PolarsResult<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }

    if results.len() != df.height() {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "{} match results cannot be merged onto {} rows",
                results.len(),
                df.height()
            )
            .into(),
        ));
    }

    // One pre-sized buffer per output column, indexed by row position
    let n = results.len();
    let mut age_vec: Vec<Option<i64>> = Vec::with_capacity(n);
    let mut country_vec: Vec<Option<String>> = Vec::with_capacity(n);
    let mut sex_vec: Vec<Option<&str>> = Vec::with_capacity(n);
    let mut year_vec: Vec<Option<i64>> = Vec::with_capacity(n);
    let mut le_vec: Vec<Option<f64>> = Vec::with_capacity(n);

    for result in results {
        age_vec.push(result.as_ref().map(|r| r.source_age));
        country_vec.push(result.as_ref().and_then(|r| r.source_country.clone()));
        sex_vec.push(result.as_ref().and_then(|r| r.source_sex));
        year_vec.push(result.as_ref().map(|r| r.source_year));
        le_vec.push(result.as_ref().map(|r| r.life_expectancy));
    }

    let tag = &spec.tag;
    let mut out = df.clone();
    out.with_column(Series::new(format!("{tag}_age").into(), age_vec))?;
    if spec.source.is_stratified() {
        out.with_column(Series::new(format!("{tag}_country").into(), country_vec))?;
        out.with_column(Series::new(format!("{tag}_sex").into(), sex_vec))?;
    }
    out.with_column(Series::new(format!("{tag}_year").into(), year_vec))?;
    out.with_column(Series::new(
        format!("{tag}_life_expectancy").into(),
        le_vec,
    ))?;

    Ok(out)
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ref_table::SourceKind;

    fn who_result(le: f64) -> LifeExpectancyResult {
        LifeExpectancyResult {
            data_source: SourceKind::Who,
            source_age: 1,
            source_year: 2019,
            life_expectancy: le,
            source_sex: Some("MLE"),
            source_country: Some("USA".to_string()),
        }
    }

    #[test]
    fn test_merge_keeps_rows_and_appends_columns() {
        let df = df! {
            "name" => ["a", "b", "c"],
            "age" => [30, 40, 50],
        }
        .unwrap();
        let results = vec![Some(who_result(76.3)), None, Some(who_result(70.0))];

        let out = merge_results(&df, &MatchSpec::who(), &results).unwrap();

        assert_eq!(out.height(), 3);
        assert_eq!(
            out.get_column_names(),
            vec![
                "name",
                "age",
                "who_age",
                "who_country",
                "who_sex",
                "who_year",
                "who_life_expectancy"
            ]
        );
        let names: Vec<Option<&str>> = out
            .column("name")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec![Some("a"), Some("b"), Some("c")]);

        let le = out.column("who_life_expectancy").unwrap().f64().unwrap();
        assert_eq!(le.get(0), Some(76.3));
        assert_eq!(le.get(1), None);
        assert_eq!(le.get(2), Some(70.0));

        let country = out.column("who_country").unwrap().str().unwrap();
        assert_eq!(country.get(1), None);
    }

    #[test]
    fn test_merge_national_layout() {
        let df = df! { "age" => [31] }.unwrap();
        let results = vec![None];

        let out = merge_results(&df, &MatchSpec::ssa(), &results).unwrap();
        assert_eq!(
            out.get_column_names(),
            vec!["age", "ssa_age", "ssa_year", "ssa_life_expectancy"]
        );
        assert_eq!(out.column("ssa_age").unwrap().null_count(), 1);
    }

    #[test]
    fn test_merge_empty_table_is_unchanged() {
        let df = df! { "age" => Vec::<i64>::new() }.unwrap();
        let out = merge_results(&df, &MatchSpec::hld(), &[]).unwrap();
        assert!(out.equals(&df));
        assert_eq!(out.width(), 1);
    }

    #[test]
    fn test_merge_rejects_misaligned_results() {
        let df = df! { "age" => [31, 32] }.unwrap();
        assert!(merge_results(&df, &MatchSpec::ssa(), &[None]).is_err());
    }
}
