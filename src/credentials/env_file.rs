use super::{CredentialError, CredentialErrorKind, CredentialSource, Credentials};

use std::collections::HashMap;
use std::path::{Path, PathBuf};


/// Keys read from the env file, in credential field order.
const KEYS: [&str; 5] = ["DB_USER", "DB_PASSWORD", "DB_HOST", "DB_PORT", "DB_NAME"];


/// A dotenv-style file holding the five credential fields.
/// The file is read directly; the process environment is left untouched.
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        EnvFile { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HashMap<String, String>, CredentialError> {
        let read_error = |source| CredentialError {
            kind: CredentialErrorKind::EnvFileRead { path: self.path.clone(), source },
        };

        dotenvy::from_path_iter(&self.path)
            .map_err(read_error)?
            .map(|item| item.map_err(read_error))
            .collect()
    }
}

#[async_trait::async_trait]
impl CredentialSource for EnvFile {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        if !self.path.is_file() {
            return Err(CredentialError { kind: CredentialErrorKind::EnvFileNotFound(self.path.clone()) });
        }

        tracing::debug!("Reading credentials from '{}'", self.path.display());
        let vars = self.read()?;

        let mut fields = [""; 5];
        for (field, key) in fields.iter_mut().zip(KEYS) {
            *field = vars.get(key).map(String::as_str).ok_or_else(|| CredentialError {
                kind: CredentialErrorKind::MissingKey { key, path: self.path.clone() },
            })?;
        }

        Credentials::from_fields(fields)
    }
}
