use bon::Builder;
use garde::Validate;
use std::collections::HashMap;
use std::fmt;

// =======================================
// QUERY FIELDS
// =======================================

/// The demographic fields a query table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Age,
    Sex,
    Year,
    Country,
}

impl QueryField {
    /// Key used in column maps and as the default column name.
    pub fn key(&self) -> &'static str {
        match self {
            QueryField::Age => "age",
            QueryField::Sex => "sex",
            QueryField::Year => "year",
            QueryField::Country => "country",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =======================================
// COLUMN MAPPING STRUCT
// =======================================

/// Names of the query-table columns holding each demographic field.
///
/// ```rust
/// # use lost_years::prelude::*;
/// let cols = ColumnConfig::builder()
///     .age("person_age")
///     .sex("gender")
///     .build();
/// assert_eq!(cols.column(QueryField::Age), "person_age");
/// assert_eq!(cols.column(QueryField::Year), "year");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Validate, Builder)]
pub struct ColumnConfig {
    #[garde(length(min = 1))]
    #[builder(into, default = String::from("age"))]
    pub age: String,

    #[garde(length(min = 1))]
    #[builder(into, default = String::from("sex"))]
    pub sex: String,

    #[garde(length(min = 1))]
    #[builder(into, default = String::from("year"))]
    pub year: String,

    // Only read by country-stratified sources
    #[garde(length(min = 1))]
    #[builder(into, default = String::from("country"))]
    pub country: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ColumnConfig {
    /// Build from a field→column map (`{"age": "person_age", ...}`).
    /// Fields absent from the map keep their default column name; unknown keys
    /// are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let lookup = |field: QueryField| {
            map.get(field.key())
                .cloned()
                .unwrap_or_else(|| field.key().to_string())
        };

        Self {
            age: lookup(QueryField::Age),
            sex: lookup(QueryField::Sex),
            year: lookup(QueryField::Year),
            country: lookup(QueryField::Country),
        }
    }

    /// Column name mapped to `field`.
    pub fn column(&self, field: QueryField) -> &str {
        match field {
            QueryField::Age => &self.age,
            QueryField::Sex => &self.sex,
            QueryField::Year => &self.year,
            QueryField::Country => &self.country,
        }
    }

    /// Every mapped column name must be non-empty.
    pub fn validate_all(&self) -> Result<(), garde::Report> {
        self.validate()
    }
}

// =======================================
// UNIT TESTS
// =======================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let cols = ColumnConfig::default();
        assert_eq!(cols.column(QueryField::Age), "age");
        assert_eq!(cols.column(QueryField::Sex), "sex");
        assert_eq!(cols.column(QueryField::Year), "year");
        assert_eq!(cols.column(QueryField::Country), "country");
        assert!(cols.validate_all().is_ok());
    }

    #[test]
    fn test_from_map_falls_back_to_defaults() {
        let map = HashMap::from([
            ("age".to_string(), "person_age".to_string()),
            ("country".to_string(), "nation".to_string()),
            ("unused".to_string(), "whatever".to_string()),
        ]);
        let cols = ColumnConfig::from_map(&map);

        assert_eq!(cols.age, "person_age");
        assert_eq!(cols.country, "nation");
        assert_eq!(cols.sex, "sex");
        assert_eq!(cols.year, "year");
    }

    #[test]
    fn test_empty_column_name_is_rejected() {
        let cols = ColumnConfig::builder().year("").build();
        let report = cols.validate_all().unwrap_err();
        assert!(report.to_string().contains("year"));
    }
}
