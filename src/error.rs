use crate::credentials::CredentialError;
use crate::db::EngineError;
use crate::suite::SuiteError;

use std::error::Error;
use std::fmt;
use tracing::subscriber::SetGlobalDefaultError;


#[derive(Debug)]
#[non_exhaustive]
pub struct PloverError {
    pub kind: PloverErrorKind
}

impl fmt::Display for PloverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PloverError: {}", self.kind)
    }
}

impl Error for PloverError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum PloverErrorKind {
    Credential(CredentialError),
    Engine(EngineError),
    ExpectationsFailed { failed: usize, total: usize },
    SetGlobalDefault(SetGlobalDefaultError),
    Suite(SuiteError),
}

impl fmt::Display for PloverErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential(error) => write!(f, "{}", error.kind),
            Self::Engine(error) => write!(f, "{}", error.kind),
            Self::ExpectationsFailed { failed, total } => write!(f, "{failed} of {total} expectation(s) failed"),
            Self::SetGlobalDefault(error) => write!(f, "Failed to set global default subscriber: {}", error),
            Self::Suite(error) => write!(f, "{}", error.kind),
        }
    }
}

impl Error for PloverErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Credential(source) => Some(source),
			Self::Engine(source) => Some(source),
			Self::SetGlobalDefault(source) => Some(source),
			Self::Suite(source) => Some(source),
			_ => None
		}
	}
}

impl From<CredentialError> for PloverError {
    fn from(error: CredentialError) -> Self {
        PloverError { kind: PloverErrorKind::Credential(error) }
    }
}

impl From<EngineError> for PloverError {
    fn from(error: EngineError) -> Self {
        PloverError { kind: PloverErrorKind::Engine(error) }
    }
}

impl From<SetGlobalDefaultError> for PloverError {
    fn from(error: SetGlobalDefaultError) -> Self {
        PloverError { kind: PloverErrorKind::SetGlobalDefault(error) }
    }
}

impl From<SuiteError> for PloverError {
    fn from(error: SuiteError) -> Self {
        PloverError { kind: PloverErrorKind::Suite(error) }
    }
}
