// {
//   "command": "check",
//   "status": "error",
//   "data": [
//     {"name": "count max in range", "success": true, "detail": "..."},
//     {"name": "count max above 100", "success": false, "detail": "..."}
//   ],
//   "error": {"type": "expectations_failed", "message": "PloverError: 1 of 2 expectation(s) failed"},
//   "timestamp": "2026-10-17T15:52:12Z"
// }
use crate::error::{PloverError, PloverErrorKind};

use chrono::{DateTime, Utc};
use serde::Serialize;


#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum PloverErrorJson {
    Credential(String),
    Engine(String),
    ExpectationsFailed(String),
    SetGlobalDefault(String),
    Suite(String),
}

impl PloverErrorJson {
    pub fn message(&self) -> &str {
        match self {
            Self::Credential(message)
            | Self::Engine(message)
            | Self::ExpectationsFailed(message)
            | Self::SetGlobalDefault(message)
            | Self::Suite(message) => message,
        }
    }
}

impl From<&PloverError> for PloverErrorJson {
    fn from(e: &PloverError) -> Self {
        let message = format!("{e}");

        match &e.kind {
            PloverErrorKind::Credential(_) => Self::Credential(message),
            PloverErrorKind::Engine(_) => Self::Engine(message),
            PloverErrorKind::ExpectationsFailed { .. } => Self::ExpectationsFailed(message),
            PloverErrorKind::SetGlobalDefault(_) => Self::SetGlobalDefault(message),
            PloverErrorKind::Suite(_) => Self::Suite(message),
        }
    }
}


#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PloverStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct PloverOutput<T: Serialize> {
    pub command: String,
    pub status: PloverStatus,
    pub data: Option<T>,
    pub error: Option<PloverErrorJson>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> PloverOutput<T> {
    pub fn success(command: &str, data: Option<T>) -> Self {
        PloverOutput {
            command: command.to_string(),
            status: PloverStatus::Success,
            data,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Data is kept next to the error, so a failed check still lists every result.
    pub fn failure(command: &str, data: Option<T>, error: &PloverError) -> Self {
        PloverOutput {
            command: command.to_string(),
            status: PloverStatus::Error,
            data,
            error: Some(PloverErrorJson::from(error)),
            timestamp: Utc::now(),
        }
    }
}
