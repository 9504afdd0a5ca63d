//! Row selection over the long table.

use hashbrown::HashSet;
use regex::Regex;
use tracing::debug;

use super::resolve::ResolvedFilter;
use crate::error::Result;
use crate::models::{CensusRecord, CensusType};

/// Characters kept from a unit when it becomes part of a column label
pub const UNIT_ABBREVIATION_LEN: usize = 3;

/// Keep rows of one year and census type
pub fn filter_year_type(
    rows: Vec<CensusRecord>,
    year: i32,
    census_type: CensusType,
) -> Vec<CensusRecord> {
    rows.into_iter()
        .filter(|r| r.year == year && r.census_type == census_type)
        .collect()
}

/// Prefix-or-exact matcher over canonical codes.
///
/// A value matches when its trimmed form starts with any code, or when the
/// value itself is one of the codes.
#[derive(Debug)]
pub struct CodeMatcher {
    prefix: Option<Regex>,
    exact: HashSet<String>,
}

impl CodeMatcher {
    pub fn new(codes: &[String]) -> Result<Self> {
        let prefix = if codes.is_empty() {
            None
        } else {
            let alternation = codes
                .iter()
                .map(|c| regex::escape(c))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!("^(?:{})", alternation))?)
        };

        Ok(Self {
            prefix,
            exact: codes.iter().cloned().collect(),
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.prefix
            .as_ref()
            .map_or(false, |re| re.is_match(value.trim()))
            || self.exact.contains(value)
    }
}

/// Collapse internal whitespace and keep the first three characters.
///
/// Distinct units sharing a three-character prefix collide.
pub fn abbreviate_unit(unit: &str) -> String {
    unit.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(UNIT_ABBREVIATION_LEN)
        .collect()
}

/// Apply a resolved code filter and abbreviate units of the kept rows.
pub fn apply_filter(rows: Vec<CensusRecord>, filter: &ResolvedFilter) -> Result<Vec<CensusRecord>> {
    let matcher = CodeMatcher::new(&filter.codes)?;
    let total = rows.len();

    let kept: Vec<CensusRecord> = rows
        .into_iter()
        .filter(|r| matcher.is_match(&filter.column.value(r)))
        .map(|mut r| {
            r.unit = r.unit.as_deref().map(abbreviate_unit);
            r
        })
        .collect();

    debug!(
        "Code filter on {} kept {}/{} rows",
        filter.column.field(),
        kept.len(),
        total
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, RegionCode};
    use crate::query::resolve::resolve_codes;
    use crate::test_support::record;

    #[test]
    fn test_matcher_prefix_or_exact() {
        let matcher = CodeMatcher::new(&["Seoul".to_string(), "a.b".to_string()]).unwrap();
        assert!(matcher.is_match("Seoul"));
        assert!(matcher.is_match("  Seoul Special City"));
        assert!(!matcher.is_match("Busan"));
        // escaped, so '.' is literal
        assert!(!matcher.is_match("axb"));
        assert!(matcher.is_match("a.b"));
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let matcher = CodeMatcher::new(&[]).unwrap();
        assert!(!matcher.is_match(""));
        assert!(!matcher.is_match("11"));
    }

    #[test]
    fn test_abbreviate_unit() {
        assert_eq!(abbreviate_unit("persons"), "per");
        assert_eq!(abbreviate_unit("  million   won "), "mil");
        assert_eq!(abbreviate_unit("m 2"), "m 2");
        assert_eq!(abbreviate_unit("명"), "명");
        assert_eq!(abbreviate_unit("가구수"), "가구수");
    }

    #[test]
    fn test_numeric_prefix_family() {
        let rows = vec![
            record("Seoul", 11, "Jongno-gu", 11010, "persons", 1.0),
            record("Seoul", 11, "Jung-gu", 11020, "persons", 2.0),
            record("Busan", 21, "Jung-gu", 21010, "persons", 3.0),
        ];
        let codes = vec![RegionCode::from(11)];
        let filter = resolve_codes(&rows, Some(&codes), Level::Adm2, true).unwrap();
        let kept = apply_filter(rows, &filter).unwrap();
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.adm1_code == 11));
        assert!(kept.iter().all(|r| r.unit.as_deref() == Some("per")));
    }

    #[test]
    fn test_year_type_filter() {
        let mut old = record("Seoul", 11, "Jongno-gu", 11010, "persons", 1.0);
        old.year = 2015;
        let mut housing = record("Seoul", 11, "Jongno-gu", 11010, "units", 1.0);
        housing.census_type = CensusType::Housing;
        let rows = vec![old, housing, record("Busan", 21, "Jung-gu", 21010, "persons", 3.0)];

        let kept = filter_year_type(rows, 2020, CensusType::Population);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].adm1, "Busan");
    }
}
