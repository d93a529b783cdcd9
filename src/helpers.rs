use polars::prelude::*;

// ================================================
// PUBLIC FUNCTIONS
// ================================================

/// Value closest to `target` (minimum absolute difference).
///
/// Ties go to the value encountered first, so repeated calls over the same
/// sequence always agree. Returns `None` for an empty sequence or a
/// non-finite target.
pub fn closest<I>(values: I, target: f64) -> Option<i64>
where
    I: IntoIterator<Item = i64>,
{
    if !target.is_finite() {
        return None;
    }

    let mut best: Option<(i64, f64)> = None;
    for value in values {
        let distance = (value as f64 - target).abs();
        // Strict comparison keeps the earliest of equally close values
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((value, distance));
        }
    }
    best.map(|(value, _)| value)
}

/// Check the column name exists in the DataFrame.
pub fn column_exists(df: &DataFrame, name: &str) -> bool {
    df.get_column_names()
        .into_iter()
        .any(|column| column.as_str() == name)
}

/// Read any column as trimmed text; nulls stay `None`.
pub fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| value.map(|s| s.trim().to_string()))
        .collect();
    Ok(values)
}

/// Read any column as `f64`; values that cannot be cast become `None`.
///
/// Text cells are trimmed before the cast, so `" 31 "` reads as `31.0`.
pub fn float_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let column = if column.dtype() == &DataType::String {
        let trimmed: Vec<Option<&str>> = column
            .str()?
            .into_iter()
            .map(|value| value.map(str::trim))
            .collect();
        Series::new(name.into(), trimmed).cast(&DataType::Float64)?
    } else {
        column.as_materialized_series().cast(&DataType::Float64)?
    };
    let values = column.f64()?.into_iter().collect();
    Ok(values)
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_picks_minimum_distance() {
        assert_eq!(closest([1, 2, 5, 10], 4.0), Some(5));
        assert_eq!(closest([1, 2, 5, 10], 100.0), Some(10));
        assert_eq!(closest([1, 2, 5, 10], -3.0), Some(1));
        assert_eq!(closest([2020, 2010], 2019.0), Some(2020));
    }

    #[test]
    fn test_closest_tie_goes_to_first_encountered() {
        for _ in 0..10 {
            assert_eq!(closest([1, 3], 2.0), Some(1));
            assert_eq!(closest([3, 1], 2.0), Some(3));
        }
    }

    #[test]
    fn test_closest_degenerate_inputs() {
        assert_eq!(closest(Vec::<i64>::new(), 1.0), None);
        assert_eq!(closest([1, 2], f64::NAN), None);
        assert_eq!(closest([1, 2], f64::INFINITY), None);
    }

    #[test]
    fn test_column_exists() {
        let df = df! {
            "age" => [25, 30],
            "name" => ["Alice", "Bob"],
        }
        .unwrap();

        assert!(column_exists(&df, "age"));
        assert!(column_exists(&df, "name"));
        assert!(!column_exists(&df, "invalid_col"));
        assert!(!column_exists(&df, "Age"));
    }

    #[test]
    fn test_text_and_float_columns() {
        let df = df! {
            "age" => [" 31 ", "x", "40.5"],
            "sex" => [Some("M"), None, Some(" f ")],
        }
        .unwrap();

        assert_eq!(float_column(&df, "age").unwrap(), vec![Some(31.0), None, Some(40.5)]);
        assert_eq!(
            text_column(&df, "sex").unwrap(),
            vec![Some("M".to_string()), None, Some("f".to_string())]
        );
    }
}
