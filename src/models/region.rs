//! Administrative levels, census types and caller-supplied region codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CensusError;

/// Years covered by the bundled dataset.
pub const SUPPORTED_YEARS: &[i32] = &[2010, 2015, 2020];

/// Returns true when the bundled dataset carries rows for `year`.
pub fn is_supported_year(year: i32) -> bool {
    SUPPORTED_YEARS.contains(&year)
}

/// Korean administrative level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Province / metropolitan city (si-do)
    Adm1,
    /// Municipality / district (si-gun-gu)
    Adm2,
}

impl Level {
    /// Name column for this level (`adm1` / `adm2`)
    pub fn name_field(&self) -> &'static str {
        match self {
            Level::Adm1 => "adm1",
            Level::Adm2 => "adm2",
        }
    }

    /// Code column for this level (`adm1_code` / `adm2_code`)
    pub fn code_field(&self) -> &'static str {
        match self {
            Level::Adm1 => "adm1_code",
            Level::Adm2 => "adm2_code",
        }
    }

    /// Boundary layer name for a year, e.g. `adm2_2020`
    pub fn layer_name(&self, year: i32) -> String {
        format!("{}_{}", self.name_field(), year)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_field())
    }
}

impl FromStr for Level {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adm1" => Ok(Level::Adm1),
            "adm2" => Ok(Level::Adm2),
            _ => Err(CensusError::InvalidLevel(s.to_string())),
        }
    }
}

/// Census topic of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CensusType {
    Population,
    Housing,
    Tax,
    Mortality,
    Economy,
    Medicine,
    Migration,
    Environment,
}

impl CensusType {
    pub fn all() -> &'static [CensusType] {
        &[
            CensusType::Population,
            CensusType::Housing,
            CensusType::Tax,
            CensusType::Mortality,
            CensusType::Economy,
            CensusType::Medicine,
            CensusType::Migration,
            CensusType::Environment,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CensusType::Population => "population",
            CensusType::Housing => "housing",
            CensusType::Tax => "tax",
            CensusType::Mortality => "mortality",
            CensusType::Economy => "economy",
            CensusType::Medicine => "medicine",
            CensusType::Migration => "migration",
            CensusType::Environment => "environment",
        }
    }
}

impl fmt::Display for CensusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CensusType {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CensusType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| CensusError::InvalidType(s.to_string()))
    }
}

/// A region identifier as supplied by the caller: a numeric code or a name token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionCode {
    Code(i64),
    Name(String),
}

impl RegionCode {
    /// Integer value of this code, if it has one.
    ///
    /// Name tokens such as `"11"` coerce; `"Seoul"` does not.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RegionCode::Code(code) => Some(*code),
            RegionCode::Name(name) => name.trim().parse().ok(),
        }
    }

    /// String form used for matching
    pub fn canonical(&self) -> String {
        match self {
            RegionCode::Code(code) => code.to_string(),
            RegionCode::Name(name) => name.trim().to_string(),
        }
    }

    /// Parse a CLI/free-text token, keeping integers as codes.
    pub fn parse_token(token: &str) -> Self {
        match token.trim().parse::<i64>() {
            Ok(code) => RegionCode::Code(code),
            Err(_) => RegionCode::Name(token.trim().to_string()),
        }
    }
}

impl From<i64> for RegionCode {
    fn from(code: i64) -> Self {
        RegionCode::Code(code)
    }
}

impl From<&str> for RegionCode {
    fn from(name: &str) -> Self {
        RegionCode::Name(name.to_string())
    }
}

impl From<String> for RegionCode {
    fn from(name: String) -> Self {
        RegionCode::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("adm1".parse::<Level>().unwrap(), Level::Adm1);
        assert_eq!(" ADM2 ".parse::<Level>().unwrap(), Level::Adm2);
        assert!(matches!(
            "adm3".parse::<Level>(),
            Err(CensusError::InvalidLevel(l)) if l == "adm3"
        ));
    }

    #[test]
    fn test_census_type_parse() {
        assert_eq!(
            "migration".parse::<CensusType>().unwrap(),
            CensusType::Migration
        );
        assert!(matches!(
            "weather".parse::<CensusType>(),
            Err(CensusError::InvalidType(_))
        ));
    }

    #[test]
    fn test_region_code_coercion() {
        assert_eq!(RegionCode::from(11).as_integer(), Some(11));
        assert_eq!(RegionCode::from(" 31010 ").as_integer(), Some(31010));
        assert_eq!(RegionCode::from("Seoul").as_integer(), None);
        assert_eq!(RegionCode::parse_token("21"), RegionCode::Code(21));
        assert_eq!(
            RegionCode::parse_token(" Busan"),
            RegionCode::Name("Busan".to_string())
        );
    }

    #[test]
    fn test_layer_name() {
        assert_eq!(Level::Adm2.layer_name(2020), "adm2_2020");
        assert_eq!(Level::Adm1.code_field(), "adm1_code");
    }
}
