/// Macro to create a RefTable for a source from column literals.
/// Usage:
/// ```rust
/// # use lost_years::prelude::*;
/// let table = refdf!(SourceKind::Hld;
///     "country" => ["SWE", "SWE"],
///     "year" => [1900, 1900],
///     "sex" => [1, 2],
///     "age" => [0, 0],
///     "life_expectancy" => [50.9, 53.6],
/// )?;
/// assert_eq!(table.len(), 2);
/// # LostYearsResult::Ok(())
/// ```
#[macro_export]
macro_rules! refdf {
    ($source:expr; $($name:expr => $val:expr),+ $(,)?) => {{
        use $crate::ref_table::RefTable;
        use polars::prelude::df;
        let df_result = df! { $($name => $val),+ };
        match df_result {
            Ok(df) => RefTable::from_df($source, &df)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error>),
            Err(e) => Err(Box::new(e) as Box<dyn std::error::Error>),
        }
    }};
}
