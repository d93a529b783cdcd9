use crate::params::QueryField;
use crate::ref_table::SourceKind;

// =======================================
// KEY RULES
// =======================================

/// How one key narrows the candidate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Snap to the closest value among the surviving candidates, then keep
    /// rows equal to it.
    Nearest,

    /// Case-insensitive equality.
    Exact,

    /// Case-insensitive equality; when nothing is equal, keep rows whose value
    /// contains the query value.
    ExactOrSubstring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRule {
    pub field: QueryField,
    pub kind: KeyKind,
}

impl KeyRule {
    pub const fn new(field: QueryField, kind: KeyKind) -> Self {
        Self { field, kind }
    }
}

// =======================================
// MATCH SPECIFICATION
// =======================================

/// Everything that differs between the sources: key order, key kinds,
/// required query columns and the output prefix.
///
/// | Source | Keys (in order)                              | Sex                          |
/// |--------|----------------------------------------------|------------------------------|
/// | SSA    | age ~, year ~                                | picks the value column       |
/// | WHO    | country =, age ~, year ~, sex =              | row filter (`MLE`/`FMLE`)    |
/// | HLD    | country = or substring, sex =, age ~, year ~ | row filter (`M`/`F`)         |
///
/// `~` nearest value, `=` case-insensitive equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpec {
    pub source: SourceKind,
    pub tag: String,
    pub keys: Vec<KeyRule>,
    /// Query columns that must exist before any matching happens.
    pub required: Vec<QueryField>,
}

impl MatchSpec {
    pub fn ssa() -> Self {
        Self {
            source: SourceKind::Ssa,
            tag: SourceKind::Ssa.tag().to_string(),
            keys: vec![
                KeyRule::new(QueryField::Age, KeyKind::Nearest),
                KeyRule::new(QueryField::Year, KeyKind::Nearest),
            ],
            required: vec![QueryField::Age, QueryField::Sex, QueryField::Year],
        }
    }

    pub fn who() -> Self {
        Self {
            source: SourceKind::Who,
            tag: SourceKind::Who.tag().to_string(),
            keys: vec![
                KeyRule::new(QueryField::Country, KeyKind::Exact),
                KeyRule::new(QueryField::Age, KeyKind::Nearest),
                KeyRule::new(QueryField::Year, KeyKind::Nearest),
                KeyRule::new(QueryField::Sex, KeyKind::Exact),
            ],
            required: vec![
                QueryField::Country,
                QueryField::Age,
                QueryField::Sex,
                QueryField::Year,
            ],
        }
    }

    pub fn hld() -> Self {
        Self {
            source: SourceKind::Hld,
            tag: SourceKind::Hld.tag().to_string(),
            keys: vec![
                KeyRule::new(QueryField::Country, KeyKind::ExactOrSubstring),
                KeyRule::new(QueryField::Sex, KeyKind::Exact),
                KeyRule::new(QueryField::Age, KeyKind::Nearest),
                KeyRule::new(QueryField::Year, KeyKind::Nearest),
            ],
            required: vec![
                QueryField::Country,
                QueryField::Age,
                QueryField::Sex,
                QueryField::Year,
            ],
        }
    }

    pub fn for_source(source: SourceKind) -> Self {
        match source {
            SourceKind::Ssa => Self::ssa(),
            SourceKind::Who => Self::who(),
            SourceKind::Hld => Self::hld(),
        }
    }

    /// Same matching policy, different output prefix.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Names of the appended columns, in output order.
    pub fn output_columns(&self) -> Vec<String> {
        let suffixes: &[&str] = if self.source.is_stratified() {
            &["age", "country", "sex", "year", "life_expectancy"]
        } else {
            &["age", "year", "life_expectancy"]
        };
        suffixes
            .iter()
            .map(|suffix| format!("{}_{suffix}", self.tag))
            .collect()
    }
}
