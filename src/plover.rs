use crate::credentials::CredentialSource;
use crate::db::{self, ContextKind, DataSource, Engine, EngineError, EngineErrorKind, SparkSource, WarehouseSource};
use crate::error::PloverError;
use crate::expectation::{ExpectationFrame, ExpectationRecorder, ExpectationResult, Reporter};
use crate::frame::Frame;


/// Runs SQL against the one configured data source and keeps the named expectation results.
pub struct Plover {
    source: Box<dyn DataSource>,
    recorder: ExpectationRecorder,
}

impl Plover {
    /// Open the engine's connection once.
    ///
    /// A cluster engine needs `connection_string` and never touches `credentials`.
    /// A warehouse engine uses `connection_string` verbatim when given, otherwise it
    /// resolves `credentials` and builds one.
    pub async fn connect(
        engine: Engine,
        connection_string: Option<&str>,
        credentials: &dyn CredentialSource,
    ) -> Result<Self, PloverError> {
        tracing::debug!("Selected the {:?} context for the {} engine", engine.context(), engine.name());

        let source: Box<dyn DataSource> = match engine.context() {
            ContextKind::Cluster => {
                let conn_str = connection_string.ok_or(EngineError {
                    kind: EngineErrorKind::MissingConnectionString(engine.name()),
                })?;
                Box::new(SparkSource::connect(conn_str).await?)
            }
            ContextKind::Warehouse => {
                let conn_str = match connection_string {
                    Some(conn_str) => conn_str.to_string(),
                    None => credentials.credentials().await?.connection_string(engine)?,
                };
                Box::new(WarehouseSource::connect(engine, &conn_str).await?)
            }
        };

        tracing::info!("Connected to {} 🐦", engine.name());
        Ok(Self::with_source(source))
    }

    pub fn with_source(source: Box<dyn DataSource>) -> Self {
        Plover { source, recorder: ExpectationRecorder::new() }
    }

    pub fn context(&self) -> ContextKind {
        self.source.context()
    }

    pub fn engine(&self) -> Engine {
        self.source.engine()
    }

    /// Run the SQL and materialise the whole result.
    pub async fn frame_from_sql(&self, sql: &str) -> Result<Frame, PloverError> {
        db::inspect_sql(self.engine(), sql);
        tracing::debug!("Running SQL: {sql}");

        let frame = self.source.fetch_frame(sql).await?;
        tracing::debug!("Fetched {} row(s) x {} column(s)", frame.num_rows(), frame.num_columns());
        Ok(frame)
    }

    pub async fn expectation_frame_from_sql(&self, sql: &str) -> Result<ExpectationFrame, PloverError> {
        Ok(self.frame_from_sql(sql).await?.into())
    }

    /// Store a result under `name`, replacing any earlier result with that name.
    pub fn capture(&mut self, name: &str, result: ExpectationResult) {
        self.recorder.capture(name, result);
    }

    pub fn recorder(&self) -> &ExpectationRecorder {
        &self.recorder
    }

    pub fn report_all(&self, reporter: &Reporter) {
        reporter.report_all(&self.recorder);
    }
}
