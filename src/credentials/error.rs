use std::error::Error;
use std::fmt;
use std::path::PathBuf;


#[derive(Debug)]
#[non_exhaustive]
pub struct CredentialError {
    pub kind: CredentialErrorKind
}

impl CredentialError {
    /// True when no credential store was found at all, as opposed to a store that failed.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, CredentialErrorKind::EnvFileNotFound(_) | CredentialErrorKind::NotFound { .. })
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialError: {}", self.kind)
    }
}

impl Error for CredentialError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum CredentialErrorKind {
    EnvFileNotFound(PathBuf),
    EnvFileRead { path: PathBuf, source: dotenvy::Error },
    Http(reqwest::Error),
    InvalidPort(String),
    InvalidUrl(String),
    MissingKey { key: &'static str, path: PathBuf },
    NoDataRow(String),
    NotFound { env_file: PathBuf },
    SheetNotFound(String),
    TooFewColumns { sheet: String, found: usize },
    UnsupportedEngine(&'static str),
}

impl fmt::Display for CredentialErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvFileNotFound(path) => write!(f, "Env file not found: '{path:?}'"),
            Self::EnvFileRead { path, .. } => write!(f, "Failed to read env file: '{path:?}'"),
            Self::Http(e) => write!(f, "Secret sheet request failed: {e}"),
            Self::InvalidPort(port) => write!(f, "Invalid port: '{port}'"),
            Self::InvalidUrl(part) => write!(f, "Cannot build a connection string: invalid {part}"),
            Self::MissingKey { key, path } => write!(f, "Missing key '{key}' in env file '{path:?}'"),
            Self::NoDataRow(sheet) => write!(f, "Secret sheet '{sheet}' has no credential row below its header"),
            Self::NotFound { env_file } => write!(
                f,
                "Could not find database credentials. Create a '{}' file with DB_USER, DB_PASSWORD, DB_HOST, DB_PORT and DB_NAME, \
                 or provide a secret sheet access token (--sheets-token).",
                env_file.display()
            ),
            Self::SheetNotFound(sheet) => write!(f, "Secret sheet '{sheet}' not found"),
            Self::TooFewColumns { sheet, found } => {
                write!(f, "Secret sheet '{sheet}' has {found} credential field(s), expected 5")
            },
            Self::UnsupportedEngine(engine) => {
                write!(f, "The {engine} engine cannot be reached with credentials; pass a connection string (--db)")
            },
        }
    }
}

impl Error for CredentialErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::EnvFileRead { source, .. } => Some(source),
			Self::Http(source) => Some(source),
			_ => None,
		}
	}
}

impl From<CredentialErrorKind> for CredentialError {
    fn from(kind: CredentialErrorKind) -> Self {
        CredentialError { kind }
    }
}

impl From<reqwest::Error> for CredentialError {
    fn from(error: reqwest::Error) -> Self {
        CredentialError { kind: CredentialErrorKind::Http(error) }
    }
}
