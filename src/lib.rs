//! Run data-quality expectations against SQL results, from either a relational warehouse
//! (Postgres, MySQL, SQLite through `sqlx`) or a Spark Connect cluster.
//!
//! ```no_run
//! # async fn run() -> Result<(), plover::PloverError> {
//! use plover::{CredentialResolver, EnvFile, Engine, Plover, Reporter};
//!
//! let credentials = CredentialResolver::new(EnvFile::new(".env"), None);
//! let mut plover = Plover::connect(Engine::Postgres, None, &credentials).await?;
//!
//! let frame = plover.expectation_frame_from_sql("SELECT count FROM birds").await?;
//! plover.capture("count max in range", frame.expect_column_max_to_be_between("count", Some(1.0), Some(10.0)));
//! plover.report_all(&Reporter::default());
//! # Ok(())
//! # }
//! ```
pub mod cli;
pub mod credentials;
pub mod db;
pub mod error;
pub mod expectation;
pub mod frame;
mod plover;
pub mod suite;

pub use credentials::{CredentialResolver, CredentialSource, Credentials, EnvFile, SecretSheet};
pub use db::{ContextKind, DataSource, Engine};
pub use error::{PloverError, PloverErrorKind};
pub use expectation::{Expectation, ExpectationFrame, ExpectationRecorder, ExpectationResult, Reporter};
pub use frame::Frame;
pub use plover::Plover;
