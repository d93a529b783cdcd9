use crate::LostYearsResult;
use calamine::{Data, Range, Reader, open_workbook_auto};
use polars::prelude::*;
use std::path::Path;

// ========= XLSX / XLS / ODS - Using Calamine =========

/// Read the first sheet of a workbook into a DataFrame of text columns.
///
/// The first row holds the headers. Every cell is kept as text so the
/// normalizer can apply the same coercion rules it uses for CSV resources.
pub fn read_spreadsheet(file_path: &Path) -> LostYearsResult<DataFrame> {
    let mut workbook = open_workbook_auto(file_path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("Workbook contains no sheets")?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let headers = parse_excel_headers(&range, 0)?;
    let columns = parse_excel_text_data(&range, 1, headers.len());

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

/// Header names of `row`, lowercased, up to the first empty cell.
///
/// Numeric header cells go through [`cell_to_text`] like data cells, so a
/// year typed as a header reads `1900` rather than `1900.0`.
pub fn parse_excel_headers(range: &Range<Data>, row: usize) -> LostYearsResult<Vec<String>> {
    let headers: Vec<String> = (0..range.width())
        .map_while(|col| cell_to_text(range.get((row, col))))
        .map(|name| name.to_lowercase())
        .collect();

    if headers.is_empty() {
        return Err("Header row is empty".into());
    }
    Ok(headers)
}

/// Collect cells column by column until a row where every cell is empty.
pub fn parse_excel_text_data(
    range: &Range<Data>,
    start_row: usize,
    ncols: usize,
) -> Vec<Vec<Option<String>>> {
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); ncols];
    let mut row_num = start_row; // Base 0

    loop {
        let row_vals = (0..ncols)
            .map(|col| cell_to_text(range.get((row_num, col))))
            .collect::<Vec<_>>();

        // A fully empty row ends the table
        if row_vals.iter().all(Option::is_none) {
            break;
        }

        // Convert from row data to column data
        for (column, value) in columns.iter_mut().zip(row_vals) {
            column.push(value);
        }

        row_num += 1;
    }

    columns
}

/// Render a cell as trimmed text; empty cells and error cells become `None`.
pub fn cell_to_text(cell: Option<&Data>) -> Option<String> {
    match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => None,
        Some(Data::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        // Whole floats are written without the fraction so "30" and 30.0 agree
        Some(Data::Float(f)) if f.fract() == 0.0 && f.is_finite() => {
            Some(format!("{}", *f as i64))
        }
        Some(other) => Some(other.to_string()),
    }
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_text() {
        assert_eq!(cell_to_text(None), None);
        assert_eq!(cell_to_text(Some(&Data::Empty)), None);
        assert_eq!(cell_to_text(Some(&Data::String("  ".into()))), None);
        assert_eq!(
            cell_to_text(Some(&Data::String(" USA ".into()))),
            Some("USA".into())
        );
        assert_eq!(cell_to_text(Some(&Data::Float(30.0))), Some("30".into()));
        assert_eq!(cell_to_text(Some(&Data::Float(76.25))), Some("76.25".into()));
        assert_eq!(cell_to_text(Some(&Data::Int(2))), Some("2".into()));
    }

    #[test]
    fn test_parse_excel_headers_and_data() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Age".into()));
        range.set_value((0, 1), Data::String(" e(x) ".into()));
        range.set_value((1, 0), Data::Float(0.0));
        range.set_value((1, 1), Data::Float(76.5));
        range.set_value((2, 0), Data::Float(1.0));
        range.set_value((2, 1), Data::Float(75.9));

        let headers = parse_excel_headers(&range, 0).unwrap();
        assert_eq!(headers, vec!["age", "e(x)"]);

        let columns = parse_excel_text_data(&range, 1, headers.len());
        assert_eq!(columns[0], vec![Some("0".to_string()), Some("1".to_string())]);
        assert_eq!(columns[1], vec![Some("76.5".to_string()), Some("75.9".to_string())]);
    }

    #[test]
    fn test_parse_excel_headers_numeric_and_empty() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 2));
        range.set_value((0, 0), Data::String("Country".into()));
        range.set_value((0, 1), Data::Float(1900.0));
        range.set_value((1, 0), Data::String("SWE".into()));

        let headers = parse_excel_headers(&range, 0).unwrap();
        assert_eq!(headers, vec!["country", "1900"]);

        let mut blank: Range<Data> = Range::new((0, 0), (1, 1));
        blank.set_value((1, 0), Data::String("SWE".into()));
        assert!(parse_excel_headers(&blank, 0).is_err());
    }
}
