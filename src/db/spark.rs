use super::arrow_utils::get_display_values;
use super::{ContextKind, DataSource, Engine, EngineError};
use crate::frame::Frame;

use arrow::datatypes::DataType;

use spark_connect as spark;


/// The Spark source uses a Spark Connect client
/// to run queries against the cluster's catalog.
pub struct SparkSource {
    session: spark::SparkSession,
}


impl SparkSource {
    /// Connect to a `sc://host:port` endpoint and open a session.
    pub async fn connect(conn_str: &str) -> Result<Self, EngineError> {
        tracing::debug!("Opening Spark Connect session...");
        let session = spark::SparkSessionBuilder::new(conn_str).build().await?;
        tracing::debug!("Spark session {} opened", session.session_id());

        Ok(SparkSource { session })
    }
}


#[async_trait::async_trait]
impl DataSource for SparkSource {
    fn context(&self) -> ContextKind {
        ContextKind::Cluster
    }

    fn engine(&self) -> Engine {
        Engine::Spark
    }

    /// Submit the SQL and collect every batch to local memory.
    async fn fetch_frame(&self, sql: &str) -> Result<Frame, EngineError> {
        let batches = self.session.query(sql).execute().await?;
        tracing::debug!("Collected {} batch(es) from Spark", batches.len());

        if batches.is_empty() {
            return self.describe_query(sql).await;
        }
        Frame::from_batches(batches)
    }
}


impl SparkSource {
    /// A zero-row frame typed from `DESCRIBE QUERY`, for results that came back without batches.
    async fn describe_query(&self, sql: &str) -> Result<Frame, EngineError> {
        let described = Frame::from_batches(
            self.session.query(&format!("DESCRIBE QUERY {sql}")).execute().await?,
        )?;
        if described.num_rows() == 0 {
            return Ok(Frame::empty());
        }

        let names = get_display_values(described.batch(), "col_name")?;
        let types = get_display_values(described.batch(), "data_type")?;

        Ok(Frame::with_columns(
            names
                .into_iter()
                .zip(types)
                .filter_map(|(name, data_type)| Some((name?, spark_type(data_type.as_deref()?))))
                .collect(),
        ))
    }
}


/// Arrow type for a Spark SQL type name, matching what a non-empty result would carry.
fn spark_type(type_name: &str) -> DataType {
    match type_name.to_lowercase().as_str() {
        "boolean" => DataType::Boolean,
        "tinyint" => DataType::Int8,
        "smallint" => DataType::Int16,
        "int" => DataType::Int32,
        "bigint" => DataType::Int64,
        "float" => DataType::Float32,
        "double" => DataType::Float64,
        name if name.starts_with("decimal") => DataType::Float64,
        _ => DataType::Utf8,
    }
}
