use super::Engine;
use sqlparser::dialect::{DatabricksDialect, Dialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};

pub static DIALECT_DATABRICKS: DatabricksDialect = DatabricksDialect;
pub static DIALECT_MYSQL: MySqlDialect = MySqlDialect {};
pub static DIALECT_POSTGRES: PostgreSqlDialect = PostgreSqlDialect {};
pub static DIALECT_SQLITE: SQLiteDialect = SQLiteDialect {};

pub fn for_engine(engine: Engine) -> &'static dyn Dialect {
    match engine {
        Engine::Postgres => &DIALECT_POSTGRES,
        Engine::Mysql => &DIALECT_MYSQL,
        Engine::Sqlite => &DIALECT_SQLITE,
        Engine::Spark => &DIALECT_DATABRICKS,
    }
}
