use std::error::Error;
use std::fmt;
use std::path::PathBuf;


#[derive(Debug)]
#[non_exhaustive]
pub struct SuiteError {
    pub kind: SuiteErrorKind
}

impl fmt::Display for SuiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiteError: {}", self.kind)
    }
}

impl Error for SuiteError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum SuiteErrorKind {
    InvalidVar(String),
    Io { path: PathBuf, source: std::io::Error },
    Toml(toml::de::Error),
}

impl fmt::Display for SuiteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVar(var) => write!(f, "Invalid variable '{var}', expected KEY=VALUE"),
            Self::Io { path, .. } => write!(f, "Failed to read suite file: '{path:?}'"),
            Self::Toml(error) => write!(f, "Invalid suite: {}", error.message()),
        }
    }
}

impl Error for SuiteErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Io { source, .. } => Some(source),
			Self::Toml(source) => Some(source),
			_ => None,
		}
	}
}

impl From<toml::de::Error> for SuiteError {
    fn from(error: toml::de::Error) -> Self {
        SuiteError { kind: SuiteErrorKind::Toml(error) }
    }
}
