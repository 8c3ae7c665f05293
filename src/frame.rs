//! The in-memory table every data source normalises its results to.
//!
//! A [`Frame`] is a single Arrow [`RecordBatch`]. Cluster results arrive as Arrow already and
//! are concatenated; warehouse rows are decoded into [`Cell`]s first and each column is typed
//! from the cells it holds.
use crate::db::EngineError;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, RecordBatch, RecordBatchOptions,
    StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use std::fmt;
use std::sync::Arc;


/// A single decoded warehouse value.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}


#[derive(Clone, Debug)]
pub struct Frame {
    batch: RecordBatch,
}

impl Frame {
    pub fn new(batch: RecordBatch) -> Self {
        Frame { batch }
    }

    /// A frame with no columns and no rows.
    pub fn empty() -> Self {
        Frame { batch: RecordBatch::new_empty(Arc::new(Schema::empty())) }
    }

    /// A frame with the given typed columns and no rows.
    pub fn with_columns(columns: Vec<(String, DataType)>) -> Self {
        let fields: Vec<Field> = columns
            .into_iter()
            .map(|(name, data_type)| Field::new(name, data_type, true))
            .collect();

        Self::new(RecordBatch::new_empty(Arc::new(Schema::new(fields))))
    }

    /// Concatenate collected batches into one frame.
    pub fn from_batches(batches: Vec<RecordBatch>) -> Result<Self, EngineError> {
        match batches.first() {
            None => Ok(Self::empty()),
            Some(first) => {
                let schema = first.schema();
                Ok(Self::new(arrow::compute::concat_batches(&schema, &batches)?))
            }
        }
    }

    /// Build a frame from decoded rows.
    ///
    /// Column types are inferred from the non-null cells: all booleans become `Boolean`,
    /// all integers `Int64`, a mix of integers and floats `Float64`, anything else `Utf8`.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, EngineError> {
        if column_names.is_empty() {
            return Ok(Self::empty());
        }

        let mut fields = Vec::with_capacity(column_names.len());
        let mut arrays = Vec::with_capacity(column_names.len());

        for (index, name) in column_names.into_iter().enumerate() {
            let data_type = infer_type(rows.iter().map(|row| cell_at(row, index)));
            arrays.push(build_array(&data_type, &rows, index));
            fields.push(Field::new(name, data_type, true));
        }

        let batch = RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &RecordBatchOptions::new().with_row_count(Some(rows.len())),
        )?;

        Ok(Frame { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect()
    }

    pub fn has_column(&self, column_name: &str) -> bool {
        self.batch.schema().index_of(column_name).is_ok()
    }

    /// Render the frame as an ASCII table.
    pub fn pretty(&self) -> Result<String, EngineError> {
        Ok(arrow::util::pretty::pretty_format_batches(&[self.batch.clone()])?.to_string())
    }

    /// Render the frame as a JSON array of row objects.
    pub fn to_json_rows(&self) -> Result<serde_json::Value, EngineError> {
        if self.batch.num_rows() == 0 {
            return Ok(serde_json::Value::Array(Vec::new()));
        }

        let mut writer = arrow::json::ArrayWriter::new(Vec::new());
        writer.write(&self.batch)?;
        writer.finish()?;

        serde_json::from_slice(&writer.into_inner())
            .map_err(|e| ArrowError::JsonError(e.to_string()).into())
    }
}


fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&Cell::Null)
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a Cell>) -> DataType {
    let mut inferred: Option<DataType> = None;

    for cell in cells {
        let next = match cell {
            Cell::Null => continue,
            Cell::Bool(_) => DataType::Boolean,
            Cell::Int(_) => DataType::Int64,
            Cell::Float(_) => DataType::Float64,
            Cell::Text(_) => return DataType::Utf8,
        };

        inferred = Some(match (inferred, next) {
            (None, next) => next,
            (Some(current), next) if current == next => current,
            (Some(DataType::Int64), DataType::Float64)
            | (Some(DataType::Float64), DataType::Int64) => DataType::Float64,
            _ => return DataType::Utf8,
        });
    }

    inferred.unwrap_or(DataType::Utf8)
}

fn build_array(data_type: &DataType, rows: &[Vec<Cell>], index: usize) -> ArrayRef {
    let cells = rows.iter().map(|row| cell_at(row, index));

    match data_type {
        DataType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(rows.len());
            for cell in cells {
                match cell {
                    Cell::Bool(v) => builder.append_value(*v),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Int64 => {
            let mut builder = Int64Builder::with_capacity(rows.len());
            for cell in cells {
                match cell {
                    Cell::Int(v) => builder.append_value(*v),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Float64 => {
            let mut builder = Float64Builder::with_capacity(rows.len());
            for cell in cells {
                match cell {
                    Cell::Float(v) => builder.append_value(*v),
                    Cell::Int(v) => builder.append_value(*v as f64),
                    _ => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        _ => {
            let mut builder = StringBuilder::new();
            for cell in cells {
                match cell {
                    Cell::Null => builder.append_null(),
                    other => builder.append_value(other.to_string()),
                }
            }
            Arc::new(builder.finish())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array, Int64Array, StringArray};
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> Vec<Vec<Cell>> {
        values.iter().map(|v| vec![Cell::Int(*v)]).collect()
    }

    #[test]
    fn test_from_rows_infers_column_types() {
        let frame = Frame::from_rows(
            vec!["id".into(), "score".into(), "name".into(), "active".into()],
            vec![
                vec![Cell::Int(1), Cell::Int(10), Cell::Text("a".into()), Cell::Bool(true)],
                vec![Cell::Int(2), Cell::Float(2.5), Cell::Null, Cell::Null],
            ],
        ).unwrap();

        let schema = frame.batch().schema();
        let types: Vec<&DataType> = schema.fields().iter().map(|f| f.data_type()).collect();
        assert_eq!(types, vec![&DataType::Int64, &DataType::Float64, &DataType::Utf8, &DataType::Boolean]);

        let scores = frame.batch().column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(scores.value(0), 10.0);
        assert_eq!(scores.value(1), 2.5);

        let names = frame.batch().column(2).as_any().downcast_ref::<StringArray>().unwrap();
        assert!(names.is_null(1));
    }

    #[test]
    fn test_mixed_text_column_falls_back_to_strings() {
        let frame = Frame::from_rows(
            vec!["mixed".into()],
            vec![vec![Cell::Int(7)], vec![Cell::Text("seven".into())]],
        ).unwrap();

        let column = frame.batch().column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(column.value(0), "7");
        assert_eq!(column.value(1), "seven");
    }

    #[test]
    fn test_from_rows_without_columns_is_empty() {
        let frame = Frame::from_rows(vec![], vec![]).unwrap();
        assert_eq!(frame.num_rows(), 0);
        assert_eq!(frame.num_columns(), 0);
    }

    #[test]
    fn test_from_batches_concatenates() {
        let first = Frame::from_rows(vec!["n".into()], ints(&[1, 2])).unwrap();
        let second = Frame::from_rows(vec!["n".into()], ints(&[3])).unwrap();

        let frame = Frame::from_batches(vec![first.batch().clone(), second.batch().clone()]).unwrap();
        assert_eq!(frame.num_rows(), 3);

        let column = frame.batch().column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(column.values().to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_with_columns_keeps_schema() {
        let frame = Frame::with_columns(vec![
            ("npi".to_string(), DataType::Int64),
            ("name".to_string(), DataType::Utf8),
        ]);

        assert_eq!(frame.num_rows(), 0);
        assert_eq!(frame.column_names(), vec!["npi", "name"]);
        assert_eq!(frame.batch().schema().field(0).data_type(), &DataType::Int64);
    }

    #[test]
    fn test_from_zero_row_batch_keeps_schema() {
        let empty = Frame::with_columns(vec![("npi".to_string(), DataType::Int64)]);
        let frame = Frame::from_batches(vec![empty.batch().clone()]).unwrap();

        assert_eq!(frame.num_rows(), 0);
        assert!(frame.has_column("npi"));
    }

    #[test]
    fn test_from_no_batches_is_empty() {
        let frame = Frame::from_batches(vec![]).unwrap();
        assert_eq!(frame.num_rows(), 0);
        assert!(frame.column_names().is_empty());
    }

    #[test]
    fn test_json_rows() {
        let frame = Frame::from_rows(
            vec!["id".into(), "name".into()],
            vec![vec![Cell::Int(1), Cell::Text("kestrel".into())]],
        ).unwrap();

        assert_eq!(
            frame.to_json_rows().unwrap(),
            serde_json::json!([{"id": 1, "name": "kestrel"}])
        );
    }

    #[test]
    fn test_pretty_contains_values() {
        let frame = Frame::from_rows(vec!["value".into()], ints(&[42])).unwrap();
        let table = frame.pretty().unwrap();
        assert!(table.contains("value"));
        assert!(table.contains("42"));
    }
}
