pub mod arrow_utils;
mod dialect;
pub mod error;
mod spark;
mod warehouse;

pub use error::{EngineError, EngineErrorKind};
pub use spark::SparkSource;
pub use warehouse::WarehouseSource;

use crate::frame::Frame;

use clap::ValueEnum;
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::parser::Parser;


/// The two execution contexts a source can belong to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Warehouse,
    Cluster,
}


/// User-facing enum to select engine
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    Postgres,
    Mysql,
    Sqlite,
    Spark,
}

impl Engine {
    pub fn context(&self) -> ContextKind {
        match self {
            Engine::Postgres | Engine::Mysql | Engine::Sqlite => ContextKind::Warehouse,
            Engine::Spark => ContextKind::Cluster,
        }
    }

    /// URL scheme of the engine's connection strings.
    pub fn scheme(&self) -> &'static str {
        match self {
            Engine::Postgres => "postgresql",
            Engine::Mysql => "mysql",
            Engine::Sqlite => "sqlite",
            Engine::Spark => "sc",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Postgres => "postgres",
            Engine::Mysql => "mysql",
            Engine::Sqlite => "sqlite",
            Engine::Spark => "spark",
        }
    }
}


/// A backend able to run a SQL string and hand back the fully materialised result.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    fn context(&self) -> ContextKind;
    fn engine(&self) -> Engine;
    async fn fetch_frame(&self, sql: &str) -> Result<Frame, EngineError>;
}


/// Parse the SQL with the engine's dialect and log anything unexpected.
/// The backend stays the authority: nothing here prevents the query from being sent.
pub fn inspect_sql(engine: Engine, sql: &str) {
    match Parser::parse_sql(dialect::for_engine(engine), sql) {
        Ok(statements) => {
            if statements.len() > 1 {
                tracing::warn!("SQL contains {} statements", statements.len());
            }
            for statement in statements.iter().filter(|s| !matches!(s, Statement::Query(_))) {
                tracing::warn!("SQL statement is not a query: '{}'", statement);
            }
        }
        Err(e) => tracing::debug!("SQL could not be parsed for {} ({}), sending as-is", engine.name(), e),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_contexts() {
        assert_eq!(Engine::Postgres.context(), ContextKind::Warehouse);
        assert_eq!(Engine::Mysql.context(), ContextKind::Warehouse);
        assert_eq!(Engine::Sqlite.context(), ContextKind::Warehouse);
        assert_eq!(Engine::Spark.context(), ContextKind::Cluster);
    }

    #[test]
    fn test_dialects_parse_queries() {
        for engine in [Engine::Postgres, Engine::Mysql, Engine::Sqlite, Engine::Spark] {
            let statements = Parser::parse_sql(dialect::for_engine(engine), "SELECT MAX(value) AS top FROM numbers")
                .unwrap_or_else(|e| panic!("{} failed: {e}", engine.name()));
            assert!(matches!(statements[0], Statement::Query(_)));
        }
    }
}
