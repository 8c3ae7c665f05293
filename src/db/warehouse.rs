use super::{ContextKind, DataSource, Engine, EngineError, EngineErrorKind};
use crate::frame::{Cell, Frame};

use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use arrow::datatypes::DataType;
use sqlx::{Column, ColumnIndex, Decode, Executor, MySqlPool, PgPool, Row, SqlitePool, TypeInfo, ValueRef};


enum WarehousePool {
    Postgres(PgPool),
    Mysql(MySqlPool),
    Sqlite(SqlitePool),
}


/// A relational warehouse reached through a single held sqlx connection.
///
/// Queries run as raw, parameterless SQL and every row is materialised before the
/// result is returned.
pub struct WarehouseSource {
    engine: Engine,
    pool: WarehousePool,
}

impl WarehouseSource {
    /// Open the connection. The pool is capped at one connection that never expires,
    /// so the same session serves every query until the source is dropped.
    pub async fn connect(engine: Engine, conn_str: &str) -> Result<Self, EngineError> {
        tracing::debug!("Connecting to {} warehouse...", engine.name());

        let pool = match engine {
            Engine::Postgres => WarehousePool::Postgres(
                PgPoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect(conn_str)
                    .await?
            ),
            Engine::Mysql => WarehousePool::Mysql(
                MySqlPoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect(conn_str)
                    .await?
            ),
            Engine::Sqlite => WarehousePool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect(conn_str)
                    .await?
            ),
            Engine::Spark => return Err(EngineError {
                kind: EngineErrorKind::WrongContext { engine: engine.name(), expected: ContextKind::Warehouse },
            }),
        };

        Ok(WarehouseSource { engine, pool })
    }

    /// Run statements that return no rows, e.g. to set up fixtures.
    pub async fn execute(&self, sql: &str) -> Result<u64, EngineError> {
        let rows_affected = match &self.pool {
            WarehousePool::Postgres(pool) => sqlx::raw_sql(sql).execute(pool).await?.rows_affected(),
            WarehousePool::Mysql(pool) => sqlx::raw_sql(sql).execute(pool).await?.rows_affected(),
            WarehousePool::Sqlite(pool) => sqlx::raw_sql(sql).execute(pool).await?.rows_affected(),
        };

        Ok(rows_affected)
    }
}


#[async_trait::async_trait]
impl DataSource for WarehouseSource {
    fn context(&self) -> ContextKind {
        ContextKind::Warehouse
    }

    fn engine(&self) -> Engine {
        self.engine
    }

    async fn fetch_frame(&self, sql: &str) -> Result<Frame, EngineError> {
        match &self.pool {
            WarehousePool::Postgres(pool) => {
                let rows = sqlx::raw_sql(sql).fetch_all(pool).await?;
                if rows.is_empty() {
                    let described = pool.describe(sql).await.map(|d| typed_columns(d.columns()));
                    return Ok(described_frame(described, sql));
                }
                rows_to_frame(&rows, postgres_cell)
            }
            WarehousePool::Mysql(pool) => {
                let rows = sqlx::raw_sql(sql).fetch_all(pool).await?;
                if rows.is_empty() {
                    let described = pool.describe(sql).await.map(|d| typed_columns(d.columns()));
                    return Ok(described_frame(described, sql));
                }
                rows_to_frame(&rows, mysql_cell)
            }
            WarehousePool::Sqlite(pool) => {
                let rows = sqlx::raw_sql(sql).fetch_all(pool).await?;
                if rows.is_empty() {
                    let described = pool.describe(sql).await.map(|d| typed_columns(d.columns()));
                    return Ok(described_frame(described, sql));
                }
                rows_to_frame(&rows, sqlite_cell)
            }
        }
    }
}


fn typed_columns<C: Column>(columns: &[C]) -> Vec<(String, DataType)> {
    columns
        .iter()
        .map(|column| (column.name().to_string(), described_type(column.type_info().name())))
        .collect()
}

/// A zero-row frame typed from the statement's described columns.
/// Statements that cannot be described (several statements, DDL) give a frame with no columns.
fn described_frame(described: Result<Vec<(String, DataType)>, sqlx::Error>, sql: &str) -> Frame {
    match described {
        Ok(columns) => Frame::with_columns(columns),
        Err(e) => {
            tracing::debug!("Could not describe empty result of '{sql}' ({e}), returning no columns");
            Frame::empty()
        }
    }
}

/// Arrow type of a described column, matching what the row decoders produce.
fn described_type(type_name: &str) -> DataType {
    match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => DataType::Boolean,
        "INT2" | "INT4" | "INT8" | "INTEGER" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT"
        | "YEAR" => DataType::Int64,
        "FLOAT4" | "FLOAT8" | "NUMERIC" | "REAL" | "FLOAT" | "DOUBLE" | "DECIMAL" => DataType::Float64,
        name if name.ends_with("UNSIGNED") => DataType::Int64,
        _ => DataType::Utf8,
    }
}


/// Column names come from the first row.
fn rows_to_frame<R: Row>(
    rows: &[R],
    to_cell: fn(&R, usize) -> Result<Cell, EngineError>,
) -> Result<Frame, EngineError> {
    let Some(first) = rows.first() else {
        return Ok(Frame::empty());
    };

    let column_names = first
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    let cells = rows
        .iter()
        .map(|row| (0..row.len()).map(|index| to_cell(row, index)).collect())
        .collect::<Result<Vec<Vec<Cell>>, EngineError>>()?;

    tracing::debug!("Fetched {} row(s)", cells.len());
    Frame::from_rows(column_names, cells)
}


fn decode<'r, R, T>(row: &'r R, index: usize, type_name: &str) -> Result<Option<T>, EngineError>
where
    R: Row,
    usize: ColumnIndex<R>,
    T: Decode<'r, R::Database>,
{
    row.try_get_unchecked::<Option<T>, _>(index).map_err(|source| EngineError {
        kind: EngineErrorKind::Decode {
            column_name: row.columns()[index].name().to_string(),
            type_name: type_name.to_string(),
            source,
        },
    })
}

/// Numeric text (NUMERIC, DECIMAL) becomes a float when it parses.
fn numeric_text(text: String) -> Cell {
    match text.parse::<f64>() {
        Ok(value) => Cell::Float(value),
        Err(_) => Cell::Text(text),
    }
}

fn postgres_cell(row: &PgRow, index: usize) -> Result<Cell, EngineError> {
    let type_name = row.columns()[index].type_info().name().to_uppercase();

    let cell = match type_name.as_str() {
        "BOOL" => decode::<_, bool>(row, index, &type_name)?.map(Cell::Bool),
        "INT2" => decode::<_, i16>(row, index, &type_name)?.map(|v| Cell::Int(v.into())),
        "INT4" => decode::<_, i32>(row, index, &type_name)?.map(|v| Cell::Int(v.into())),
        "INT8" => decode::<_, i64>(row, index, &type_name)?.map(Cell::Int),
        "FLOAT4" => decode::<_, f32>(row, index, &type_name)?.map(|v| Cell::Float(v.into())),
        "FLOAT8" => decode::<_, f64>(row, index, &type_name)?.map(Cell::Float),
        "NUMERIC" => decode::<_, String>(row, index, &type_name)?.map(numeric_text),
        _ => decode::<_, String>(row, index, &type_name)?.map(Cell::Text),
    };

    Ok(cell.unwrap_or(Cell::Null))
}

fn mysql_cell(row: &MySqlRow, index: usize) -> Result<Cell, EngineError> {
    let type_name = row.columns()[index].type_info().name().to_uppercase();

    let cell = match type_name.as_str() {
        "BOOLEAN" => decode::<_, i64>(row, index, &type_name)?.map(|v| Cell::Bool(v != 0)),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            decode::<_, i64>(row, index, &type_name)?.map(Cell::Int)
        }
        name if name.ends_with("UNSIGNED") => {
            decode::<_, u64>(row, index, &type_name)?.map(|v| match i64::try_from(v) {
                Ok(v) => Cell::Int(v),
                Err(_) => Cell::Float(v as f64),
            })
        }
        "FLOAT" | "DOUBLE" => decode::<_, f64>(row, index, &type_name)?.map(Cell::Float),
        "DECIMAL" => decode::<_, String>(row, index, &type_name)?.map(numeric_text),
        _ => decode::<_, String>(row, index, &type_name)?.map(Cell::Text),
    };

    Ok(cell.unwrap_or(Cell::Null))
}

/// SQLite is dynamically typed, so the stored value decides how it is read.
fn sqlite_cell(row: &SqliteRow, index: usize) -> Result<Cell, EngineError> {
    let value = row.try_get_raw(index)?;
    if value.is_null() {
        return Ok(Cell::Null);
    }
    let type_name = value.type_info().name().to_uppercase();

    let cell = match type_name.as_str() {
        "INTEGER" => decode::<_, i64>(row, index, &type_name)?.map(Cell::Int),
        "REAL" => decode::<_, f64>(row, index, &type_name)?.map(Cell::Float),
        "BOOLEAN" => decode::<_, bool>(row, index, &type_name)?.map(Cell::Bool),
        "BLOB" => decode::<_, Vec<u8>>(row, index, &type_name)?
            .map(|bytes| Cell::Text(String::from_utf8_lossy(&bytes).into_owned())),
        _ => decode::<_, String>(row, index, &type_name)?.map(Cell::Text),
    };

    Ok(cell.unwrap_or(Cell::Null))
}
