//! Region code resolution.
//!
//! Turns the caller's codes (absent, integers, or name tokens) into the column
//! to match against and the canonical string codes to match with. Municipal
//! name queries that hit a province name are promoted to provincial level.

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::{CensusError, Result};
use crate::models::{CensusRecord, Level, RegionCode};

/// Column a resolved filter is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryColumn {
    /// `adm1_code` / `adm2_code`
    Code(Level),
    /// `adm1` / `adm2`
    Name(Level),
}

impl QueryColumn {
    pub fn field(&self) -> &'static str {
        match self {
            QueryColumn::Code(level) => level.code_field(),
            QueryColumn::Name(level) => level.name_field(),
        }
    }

    /// String value of this column for a row
    pub fn value(&self, record: &CensusRecord) -> String {
        match self {
            QueryColumn::Code(level) => record.code(*level).to_string(),
            QueryColumn::Name(level) => record.name(*level).to_string(),
        }
    }
}

/// How the codes were interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// No codes given: every code present in the data
    All,
    Numeric,
    NamePrefix,
}

/// Canonical filter for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub requested_level: Level,
    pub resolved_level: Level,
    pub column: QueryColumn,
    pub codes: Vec<String>,
    pub kind: CodeKind,
}

impl ResolvedFilter {
    pub fn was_promoted(&self) -> bool {
        self.requested_level != self.resolved_level
    }
}

/// Resolve `codes` against the year/type-filtered `rows`.
///
/// Fails with [`CensusError::MixedCodeType`] when integer-like and textual
/// codes are mixed. A list with no integer-like code is matched by name prefix.
pub fn resolve_codes(
    rows: &[CensusRecord],
    codes: Option<&[RegionCode]>,
    level: Level,
    auto_promote: bool,
) -> Result<ResolvedFilter> {
    let Some(codes) = codes else {
        let all: BTreeSet<i64> = rows.iter().map(|r| r.code(level)).collect();
        debug!("No codes given, matching all {} {} codes", all.len(), level);
        return Ok(ResolvedFilter {
            requested_level: level,
            resolved_level: level,
            column: QueryColumn::Code(level),
            codes: all.into_iter().map(|c| c.to_string()).collect(),
            kind: CodeKind::All,
        });
    };

    let (numeric, textual): (Vec<&RegionCode>, Vec<&RegionCode>) =
        codes.iter().partition(|c| c.as_integer().is_some());

    if textual.is_empty() {
        return Ok(ResolvedFilter {
            requested_level: level,
            resolved_level: level,
            column: QueryColumn::Code(level),
            codes: numeric
                .iter()
                .filter_map(|c| c.as_integer())
                .map(|c| c.to_string())
                .collect(),
            kind: CodeKind::Numeric,
        });
    }

    if !numeric.is_empty() {
        return Err(CensusError::MixedCodeType(textual[0].canonical()));
    }

    let tokens: Vec<String> = textual.iter().map(|c| c.canonical()).collect();

    if level == Level::Adm2 && auto_promote {
        let provinces = matching_provinces(rows, &tokens);
        if !provinces.is_empty() {
            info!(
                "Name codes {:?} match provinces {:?}; answering at adm1 level",
                tokens, provinces
            );
            return Ok(ResolvedFilter {
                requested_level: level,
                resolved_level: Level::Adm1,
                column: QueryColumn::Name(Level::Adm1),
                codes: provinces,
                kind: CodeKind::NamePrefix,
            });
        }
    }

    Ok(ResolvedFilter {
        requested_level: level,
        resolved_level: level,
        column: QueryColumn::Name(level),
        codes: tokens,
        kind: CodeKind::NamePrefix,
    })
}

/// Distinct stripped province names starting with any token
fn matching_provinces(rows: &[CensusRecord], tokens: &[String]) -> Vec<String> {
    let names: BTreeSet<&str> = rows
        .iter()
        .map(|r| r.adm1.trim())
        .filter(|name| tokens.iter().any(|t| name.starts_with(t.as_str())))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn rows() -> Vec<CensusRecord> {
        vec![
            record("Seoul", 11, "Jongno-gu", 11010, "persons", 1.0),
            record("Seoul", 11, "Jung-gu", 11020, "persons", 2.0),
            record("Busan", 21, "Jung-gu", 21010, "persons", 3.0),
            record("Gyeonggi-do", 31, "Suwon-si", 31010, "persons", 4.0),
        ]
    }

    #[test]
    fn test_absent_codes_take_all() {
        let filter = resolve_codes(&rows(), None, Level::Adm1, true).unwrap();
        assert_eq!(filter.kind, CodeKind::All);
        assert_eq!(filter.column, QueryColumn::Code(Level::Adm1));
        assert_eq!(filter.codes, vec!["11", "21", "31"]);
    }

    #[test]
    fn test_numeric_codes() {
        let codes = vec![RegionCode::from(11), RegionCode::from("31010")];
        let filter = resolve_codes(&rows(), Some(&codes), Level::Adm2, true).unwrap();
        assert_eq!(filter.kind, CodeKind::Numeric);
        assert_eq!(filter.column.field(), "adm2_code");
        assert_eq!(filter.codes, vec!["11", "31010"]);
    }

    #[test]
    fn test_mixed_codes_rejected() {
        let codes = vec![RegionCode::from(11), RegionCode::from("Seoul")];
        let err = resolve_codes(&rows(), Some(&codes), Level::Adm2, true).unwrap_err();
        assert!(matches!(err, CensusError::MixedCodeType(ref t) if t == "Seoul"));
    }

    #[test]
    fn test_non_alphabetic_token_rejected() {
        let codes = vec![RegionCode::from(11), RegionCode::from("11-")];
        let err = resolve_codes(&rows(), Some(&codes), Level::Adm2, true).unwrap_err();
        assert!(matches!(err, CensusError::MixedCodeType(ref t) if t == "11-"));
    }

    #[test]
    fn test_textual_list_with_non_alphabetic_token() {
        let codes = vec![RegionCode::from("Jongno"), RegionCode::from("11-")];
        let filter = resolve_codes(&rows(), Some(&codes), Level::Adm2, true).unwrap();
        assert_eq!(filter.kind, CodeKind::NamePrefix);
        assert_eq!(filter.column, QueryColumn::Name(Level::Adm2));
        assert_eq!(filter.codes, vec!["Jongno", "11-"]);
    }

    #[test]
    fn test_province_name_promotes_municipal_query() {
        let codes = vec![RegionCode::from(" Seo")];
        let filter = resolve_codes(&rows(), Some(&codes), Level::Adm2, true).unwrap();
        assert!(filter.was_promoted());
        assert_eq!(filter.column, QueryColumn::Name(Level::Adm1));
        assert_eq!(filter.codes, vec!["Seoul"]);
    }

    #[test]
    fn test_promotion_can_be_disabled() {
        let codes = vec![RegionCode::from("Seoul")];
        let filter = resolve_codes(&rows(), Some(&codes), Level::Adm2, false).unwrap();
        assert!(!filter.was_promoted());
        assert_eq!(filter.column, QueryColumn::Name(Level::Adm2));
        assert_eq!(filter.codes, vec!["Seoul"]);
    }

    #[test]
    fn test_municipal_names_fall_back() {
        let codes = vec![RegionCode::from("Suwon"), RegionCode::from("Jung")];
        let filter = resolve_codes(&rows(), Some(&codes), Level::Adm2, true).unwrap();
        assert_eq!(filter.resolved_level, Level::Adm2);
        assert_eq!(filter.column, QueryColumn::Name(Level::Adm2));
        assert_eq!(filter.codes, vec!["Suwon", "Jung"]);
    }

    #[test]
    fn test_korean_names_are_textual() {
        let codes = vec![RegionCode::from("서울")];
        let filter = resolve_codes(&rows(), Some(&codes), Level::Adm1, true).unwrap();
        assert_eq!(filter.kind, CodeKind::NamePrefix);
        assert_eq!(filter.column, QueryColumn::Name(Level::Adm1));
    }
}
