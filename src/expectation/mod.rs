//! Data-quality expectations over a [`Frame`].
//!
//! Every expectation evaluates to an [`ExpectationResult`] carrying an explicit success flag
//! and a one-line detail. A missing column, a non-numeric column given to a numeric
//! expectation or an aggregate over no values is a failed result, never an error.
mod recorder;
mod report;

pub use recorder::ExpectationRecorder;
pub use report::Reporter;

use crate::db::arrow_utils::{get_display_values, get_null_count, get_numeric_values};
use crate::db::{EngineError, EngineErrorKind};
use crate::frame::Frame;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;


/// At most this many offending values are quoted in a detail.
const SAMPLE_SIZE: usize = 5;


#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpectationResult {
    pub success: bool,
    pub detail: String,
}

impl ExpectationResult {
    pub fn new(success: bool, detail: impl Into<String>) -> Self {
        ExpectationResult { success, detail: detail.into() }
    }

    pub fn pass(detail: impl Into<String>) -> Self {
        Self::new(true, detail)
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self::new(false, detail)
    }
}


/// A literal value an expectation compares against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(v) => v.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}


/// Inclusive bounds; a missing side is unbounded.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(min) => write!(f, "[{min}, ")?,
            None => write!(f, "[-inf, ")?,
        }
        match self.max {
            Some(max) => write!(f, "{max}]"),
            None => write!(f, "inf]"),
        }
    }
}


fn sample<T: fmt::Display>(values: &[T]) -> String {
    let mut quoted: Vec<String> = values.iter().take(SAMPLE_SIZE).map(|v| v.to_string()).collect();
    if values.len() > SAMPLE_SIZE {
        quoted.push("...".to_string());
    }
    format!("[{}]", quoted.join(", "))
}


/// A frame prepared for expectations. Wrapping moves the frame, nothing is copied.
#[derive(Clone, Debug)]
pub struct ExpectationFrame {
    frame: Frame,
}

impl From<Frame> for ExpectationFrame {
    fn from(frame: Frame) -> Self {
        ExpectationFrame { frame }
    }
}

impl ExpectationFrame {
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    fn numeric(&self, column: &str) -> Result<Vec<f64>, EngineError> {
        Ok(get_numeric_values(self.frame.batch(), column)?.into_iter().flatten().collect())
    }

    fn strings(&self, column: &str) -> Result<Vec<String>, EngineError> {
        Ok(get_display_values(self.frame.batch(), column)?.into_iter().flatten().collect())
    }

    pub fn expect_column_to_exist(&self, column: &str) -> ExpectationResult {
        const NAME: &str = "expect_column_to_exist";

        if self.frame.has_column(column) {
            ExpectationResult::pass(format!("{NAME}: column '{column}' exists"))
        } else {
            ExpectationResult::fail(format!(
                "{NAME}: column '{column}' not found in {}",
                sample(&self.frame.column_names())
            ))
        }
    }

    pub fn expect_table_row_count_to_be_between(&self, min: Option<u64>, max: Option<u64>) -> ExpectationResult {
        const NAME: &str = "expect_table_row_count_to_be_between";

        let rows = self.frame.num_rows() as u64;
        let success = min.is_none_or(|min| rows >= min) && max.is_none_or(|max| rows <= max);
        let bounds = Bounds { min: min.map(|v| v as f64), max: max.map(|v| v as f64) };

        ExpectationResult::new(
            success,
            format!("{NAME}: {rows} row(s) {} {bounds}", if success { "within" } else { "outside" }),
        )
    }

    pub fn expect_column_values_to_not_be_null(&self, column: &str) -> ExpectationResult {
        const NAME: &str = "expect_column_values_to_not_be_null";

        match get_null_count(self.frame.batch(), column) {
            Ok(0) => ExpectationResult::pass(format!("{NAME}: column '{column}' has no nulls")),
            Ok(nulls) => ExpectationResult::fail(format!(
                "{NAME}: column '{column}' has {nulls} null(s) in {} row(s)",
                self.frame.num_rows()
            )),
            Err(e) => ExpectationResult::fail(format!("{NAME}: {}", e.kind)),
        }
    }

    pub fn expect_column_values_to_be_between(
        &self,
        column: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> ExpectationResult {
        const NAME: &str = "expect_column_values_to_be_between";

        let values = match self.numeric(column) {
            Ok(values) => values,
            Err(e) => return ExpectationResult::fail(format!("{NAME}: {}", e.kind)),
        };
        let bounds = Bounds { min, max };
        let outside: Vec<f64> = values.iter().copied().filter(|v| !bounds.contains(*v)).collect();

        if outside.is_empty() {
            ExpectationResult::pass(format!(
                "{NAME}: all {} value(s) of '{column}' within {bounds}",
                values.len()
            ))
        } else {
            ExpectationResult::fail(format!(
                "{NAME}: {} of {} value(s) of '{column}' outside {bounds}, e.g. {}",
                outside.len(),
                values.len(),
                sample(&outside)
            ))
        }
    }

    pub fn expect_column_values_to_be_unique(&self, column: &str) -> ExpectationResult {
        const NAME: &str = "expect_column_values_to_be_unique";

        let values = match self.strings(column) {
            Ok(values) => values,
            Err(e) => return ExpectationResult::fail(format!("{NAME}: {}", e.kind)),
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for value in &values {
            let count = counts.entry(value.as_str()).or_default();
            *count += 1;
            if *count == 2 {
                duplicates.push(value.as_str());
            }
        }

        if duplicates.is_empty() {
            ExpectationResult::pass(format!("{NAME}: all {} value(s) of '{column}' are unique", values.len()))
        } else {
            ExpectationResult::fail(format!(
                "{NAME}: {} duplicated value(s) in '{column}', e.g. {}",
                duplicates.len(),
                sample(&duplicates)
            ))
        }
    }

    pub fn expect_column_values_to_be_in_set(&self, column: &str, value_set: &[Scalar]) -> ExpectationResult {
        const NAME: &str = "expect_column_values_to_be_in_set";

        if !self.frame.has_column(column) {
            let e = EngineErrorKind::ColumnNotFound { column_name: column.to_string() };
            return ExpectationResult::fail(format!("{NAME}: {e}"));
        }

        // Numeric columns compare numerically so that 5 matches 5.0.
        let numeric_set: Option<Vec<f64>> = value_set.iter().map(Scalar::as_f64).collect();
        let numeric_values = numeric_set
            .as_ref()
            .and_then(|set| self.numeric(column).ok().map(|values| (set, values)));

        let (checked, unexpected): (usize, Vec<String>) = match numeric_values {
            Some((set, values)) => (
                values.len(),
                values.iter().filter(|v| !set.contains(*v)).map(|v| v.to_string()).collect(),
            ),
            None => {
                let set: Vec<String> = value_set.iter().map(Scalar::to_string).collect();
                match self.strings(column) {
                    Ok(values) => (
                        values.len(),
                        values.into_iter().filter(|v| !set.contains(v)).collect(),
                    ),
                    Err(e) => return ExpectationResult::fail(format!("{NAME}: {}", e.kind)),
                }
            }
        };

        if unexpected.is_empty() {
            ExpectationResult::pass(format!(
                "{NAME}: all {checked} value(s) of '{column}' in {}",
                sample(value_set)
            ))
        } else {
            ExpectationResult::fail(format!(
                "{NAME}: {} of {checked} value(s) of '{column}' not in {}, e.g. {}",
                unexpected.len(),
                sample(value_set),
                sample(&unexpected)
            ))
        }
    }

    fn expect_aggregate_to_be_between(
        &self,
        name: &str,
        label: &str,
        column: &str,
        bounds: Bounds,
        aggregate: fn(&[f64]) -> f64,
    ) -> ExpectationResult {
        let values = match self.numeric(column) {
            Ok(values) => values,
            Err(e) => return ExpectationResult::fail(format!("{name}: {}", e.kind)),
        };
        if values.is_empty() {
            return ExpectationResult::fail(format!("{name}: column '{column}' has no non-null values"));
        }

        let observed = aggregate(&values);
        let success = bounds.contains(observed);

        ExpectationResult::new(
            success,
            format!(
                "{name}: {label} of '{column}' is {observed}, {} {bounds}",
                if success { "within" } else { "outside" }
            ),
        )
    }

    pub fn expect_column_min_to_be_between(&self, column: &str, min: Option<f64>, max: Option<f64>) -> ExpectationResult {
        self.expect_aggregate_to_be_between(
            "expect_column_min_to_be_between", "min", column, Bounds { min, max },
            |values| values.iter().copied().fold(f64::INFINITY, f64::min),
        )
    }

    pub fn expect_column_max_to_be_between(&self, column: &str, min: Option<f64>, max: Option<f64>) -> ExpectationResult {
        self.expect_aggregate_to_be_between(
            "expect_column_max_to_be_between", "max", column, Bounds { min, max },
            |values| values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    }

    pub fn expect_column_mean_to_be_between(&self, column: &str, min: Option<f64>, max: Option<f64>) -> ExpectationResult {
        self.expect_aggregate_to_be_between(
            "expect_column_mean_to_be_between", "mean", column, Bounds { min, max },
            |values| values.iter().sum::<f64>() / values.len() as f64,
        )
    }

    pub fn expect_column_sum_to_be_between(&self, column: &str, min: Option<f64>, max: Option<f64>) -> ExpectationResult {
        self.expect_aggregate_to_be_between(
            "expect_column_sum_to_be_between", "sum", column, Bounds { min, max },
            |values| values.iter().sum(),
        )
    }
}


/// An expectation described as data, as found in suite files.
/// The `expect` tag is the method name without its `expect_` prefix.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Expectation {
    ColumnToExist { column: String },
    TableRowCountToBeBetween { min: Option<u64>, max: Option<u64> },
    ColumnValuesToNotBeNull { column: String },
    ColumnValuesToBeBetween { column: String, min: Option<f64>, max: Option<f64> },
    ColumnValuesToBeUnique { column: String },
    ColumnValuesToBeInSet { column: String, values: Vec<Scalar> },
    ColumnMinToBeBetween { column: String, min: Option<f64>, max: Option<f64> },
    ColumnMaxToBeBetween { column: String, min: Option<f64>, max: Option<f64> },
    ColumnMeanToBeBetween { column: String, min: Option<f64>, max: Option<f64> },
    ColumnSumToBeBetween { column: String, min: Option<f64>, max: Option<f64> },
}

impl Expectation {
    pub fn evaluate(&self, frame: &ExpectationFrame) -> ExpectationResult {
        match self {
            Self::ColumnToExist { column } => frame.expect_column_to_exist(column),
            Self::TableRowCountToBeBetween { min, max } => frame.expect_table_row_count_to_be_between(*min, *max),
            Self::ColumnValuesToNotBeNull { column } => frame.expect_column_values_to_not_be_null(column),
            Self::ColumnValuesToBeBetween { column, min, max } => {
                frame.expect_column_values_to_be_between(column, *min, *max)
            }
            Self::ColumnValuesToBeUnique { column } => frame.expect_column_values_to_be_unique(column),
            Self::ColumnValuesToBeInSet { column, values } => frame.expect_column_values_to_be_in_set(column, values),
            Self::ColumnMinToBeBetween { column, min, max } => frame.expect_column_min_to_be_between(column, *min, *max),
            Self::ColumnMaxToBeBetween { column, min, max } => frame.expect_column_max_to_be_between(column, *min, *max),
            Self::ColumnMeanToBeBetween { column, min, max } => frame.expect_column_mean_to_be_between(column, *min, *max),
            Self::ColumnSumToBeBetween { column, min, max } => frame.expect_column_sum_to_be_between(column, *min, *max),
        }
    }
}
