//! Database credential retrieval.
//!
//! Credentials come from a local env file first and, only when that file is absent,
//! from a named secret sheet. They are held long enough to build a connection string.
mod env_file;
pub mod error;
mod sheet;

pub use env_file::EnvFile;
pub use error::{CredentialError, CredentialErrorKind};
pub use sheet::SecretSheet;

use crate::db::Engine;

use std::fmt;
use url::Url;


#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

impl Credentials {
    /// Build from the five positional fields `[username, password, host, port, database]`.
    pub fn from_fields(fields: [&str; 5]) -> Result<Self, CredentialError> {
        let [username, password, host, port, database] = fields.map(str::trim);

        let port = port.parse::<u16>().map_err(|_| CredentialError {
            kind: CredentialErrorKind::InvalidPort(port.to_string()),
        })?;

        Ok(Credentials {
            username: username.to_string(),
            password: password.to_string(),
            host: host.to_string(),
            port,
            database: database.to_string(),
        })
    }

    /// `<scheme>://<user>:<password>@<host>:<port>/<database>`, with user and password percent-encoded.
    pub fn connection_string(&self, engine: Engine) -> Result<String, CredentialError> {
        if matches!(engine, Engine::Sqlite | Engine::Spark) {
            return Err(CredentialError { kind: CredentialErrorKind::UnsupportedEngine(engine.name()) });
        }

        let invalid = |part: &str| CredentialError { kind: CredentialErrorKind::InvalidUrl(part.to_string()) };

        let mut url = Url::parse(&format!("{}://{}:{}", engine.scheme(), self.host, self.port))
            .map_err(|_| invalid("host"))?;
        url.set_username(&self.username).map_err(|_| invalid("username"))?;
        url.set_password(Some(&self.password)).map_err(|_| invalid("password"))?;
        url.set_path(&format!("/{}", self.database));

        Ok(url.to_string())
    }
}


/// Anything that can hand out database credentials.
#[async_trait::async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credentials(&self) -> Result<Credentials, CredentialError>;
}


/// Env file first, secret sheet as the fallback when the file does not exist.
pub struct CredentialResolver {
    env_file: EnvFile,
    sheet: Option<SecretSheet>,
}

impl CredentialResolver {
    pub fn new(env_file: EnvFile, sheet: Option<SecretSheet>) -> Self {
        CredentialResolver { env_file, sheet }
    }
}

#[async_trait::async_trait]
impl CredentialSource for CredentialResolver {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        match self.env_file.credentials().await {
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}", e.kind);
            }
            other => return other,
        }

        match &self.sheet {
            Some(sheet) => {
                tracing::info!("Env file absent, reading credentials from secret sheet '{}'", sheet.name());
                sheet.credentials().await
            }
            None => Err(CredentialError {
                kind: CredentialErrorKind::NotFound { env_file: self.env_file.path().to_path_buf() },
            }),
        }
    }
}
