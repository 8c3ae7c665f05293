use crate::db::error::{EngineError, EngineErrorKind};
use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};


/// Retrieves a column from an Arrow RecordBatch by column name.
pub fn get_column_by_name<'a>(
    batch: &'a RecordBatch,
    column_name: &str,
) -> Result<&'a ArrayRef, EngineError> {
    let column_index = batch
        .schema()
        .index_of(column_name)
        .map_err(|_| EngineError {
            kind: EngineErrorKind::ColumnNotFound {
                column_name: column_name.to_string(),
            },
        })?;

    Ok(batch.column(column_index))
}


/// Read a numeric column as `f64` values, keeping nulls.
/// Integer, float and decimal columns are all accepted.
pub fn get_numeric_values(
    batch: &RecordBatch,
    column_name: &str,
) -> Result<Vec<Option<f64>>, EngineError> {
    let array = get_column_by_name(batch, column_name)?;

    let mismatch = || EngineError {
        kind: EngineErrorKind::ColumnTypeMismatch {
            column_name: column_name.to_string(),
            expected: "numeric",
            found: array.data_type().clone(),
        },
    };

    if !array.data_type().is_numeric() {
        return Err(mismatch());
    }

    let floats = arrow::compute::cast(array.as_ref(), &DataType::Float64)?;
    let floats = floats
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(mismatch)?;

    Ok(floats.iter().collect())
}


/// Read any column as display strings, keeping nulls.
pub fn get_display_values(
    batch: &RecordBatch,
    column_name: &str,
) -> Result<Vec<Option<String>>, EngineError> {
    let array = get_column_by_name(batch, column_name)?;
    let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;

    Ok((0..array.len())
        .map(|row| {
            if array.is_null(row) {
                None
            } else {
                Some(formatter.value(row).to_string())
            }
        })
        .collect())
}


/// Count the nulls of a column.
pub fn get_null_count(batch: &RecordBatch, column_name: &str) -> Result<usize, EngineError> {
    Ok(get_column_by_name(batch, column_name)?.null_count())
}
