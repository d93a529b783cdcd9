//! Age parsing for life-table resources.
//!
//! Most resources carry exact integer ages, but the WHO extracts use banded
//! codes such as `AGELT1`, `AGE5-9` or `AGE85PLUS`. Each band is snapped to a
//! representative integer so it can take part in nearest-value matching.

// ================================================
// PUBLIC FUNCTIONS
// ================================================

/// Map a WHO age-group code to its representative age.
///
/// - `AGELT1` → 1
/// - `AGE85PLUS` → 85
/// - `AGE100+` → 100
/// - `AGE{a}-{b}` → `a`
/// - any other code → 0
pub fn convert_age_group(code: &str) -> i64 {
    let code = code.trim().to_uppercase();
    match code.as_str() {
        "AGE100+" => 100,
        "AGE85PLUS" => 85,
        "AGELT1" => 1,
        _ => lower_bound_of_range(&code).unwrap_or(0),
    }
}

/// Parse an age cell: banded `AGE...` codes go through [`convert_age_group`],
/// everything else must be numeric. Returns `None` for values that cannot be
/// coerced.
pub fn parse_age(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("AGE"))
    {
        return Some(convert_age_group(trimmed));
    }
    parse_whole_number(trimmed)
}

/// Parse a cell as a whole number, accepting float notation ("30.0").
pub fn parse_whole_number(raw: &str) -> Option<i64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value.trunc() as i64)
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

// "AGE{a}-{b}" with both bounds numeric
fn lower_bound_of_range(code: &str) -> Option<i64> {
    let (lower, upper) = code.strip_prefix("AGE")?.split_once('-')?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(lower) || !is_digits(upper) {
        return None;
    }
    lower.parse().ok()
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_age_group_special_codes() {
        assert_eq!(convert_age_group("AGELT1"), 1);
        assert_eq!(convert_age_group("AGE85PLUS"), 85);
        assert_eq!(convert_age_group("AGE100+"), 100);
    }

    #[test]
    fn test_convert_age_group_ranges() {
        assert_eq!(convert_age_group("AGE1-4"), 1);
        assert_eq!(convert_age_group("AGE5-9"), 5);
        assert_eq!(convert_age_group("age80-84"), 80);
    }

    #[test]
    fn test_convert_age_group_unknown_code() {
        assert_eq!(convert_age_group("AGEUNKNOWN"), 0);
        assert_eq!(convert_age_group("AGE5-"), 0);
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("42"), Some(42));
        assert_eq!(parse_age(" 30.0 "), Some(30));
        assert_eq!(parse_age("AGE85PLUS"), Some(85));
        assert_eq!(parse_age("eighty"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("NaN"), None);
    }
}
