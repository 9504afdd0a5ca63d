//! Cell aggregation policy for pivots and provincial roll-ups.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// User-supplied reducer for [`Aggregator::Custom`]
pub type Reducer = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// How duplicate cells and grouped rows are combined.
///
/// Missing values are dropped before reduction; a cell with no values stays
/// missing.
#[derive(Clone, Default)]
pub enum Aggregator {
    #[default]
    Sum,
    Mean,
    Min,
    Max,
    Custom(Reducer),
}

impl Aggregator {
    pub fn custom<F>(reducer: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Aggregator::Custom(Arc::new(reducer))
    }

    /// Reduce a group of values. Returns `None` for an empty group.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let out = match self {
            Aggregator::Sum => values.iter().sum(),
            Aggregator::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregator::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregator::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregator::Custom(reducer) => reducer(values),
        };
        Some(out)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregator::Sum => "sum",
            Aggregator::Mean => "mean",
            Aggregator::Min => "min",
            Aggregator::Max => "max",
            Aggregator::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aggregator::{}", self.name())
    }
}

impl FromStr for Aggregator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Aggregator::Sum),
            "mean" | "avg" => Ok(Aggregator::Mean),
            "min" => Ok(Aggregator::Min),
            "max" => Ok(Aggregator::Max),
            other => Err(format!(
                "unknown aggregator '{}': expected sum, mean, min or max",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_reducers() {
        let values = [4.0, 1.0, 7.0];
        assert_eq!(Aggregator::Sum.apply(&values), Some(12.0));
        assert_eq!(Aggregator::Mean.apply(&values), Some(4.0));
        assert_eq!(Aggregator::Min.apply(&values), Some(1.0));
        assert_eq!(Aggregator::Max.apply(&values), Some(7.0));
        assert_eq!(Aggregator::Sum.apply(&[]), None);
    }

    #[test]
    fn test_custom_reducer() {
        let count = Aggregator::custom(|v| v.len() as f64);
        assert_eq!(count.apply(&[3.0, 3.0]), Some(2.0));
        assert_eq!(format!("{:?}", count), "Aggregator::custom");
    }

    #[test]
    fn test_parse() {
        assert_eq!("MEAN".parse::<Aggregator>().unwrap().name(), "mean");
        assert!("median".parse::<Aggregator>().is_err());
    }
}
