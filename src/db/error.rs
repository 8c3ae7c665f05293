use std::error::Error;
use std::fmt;

use crate::db::ContextKind;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;


#[derive(Debug)]
#[non_exhaustive]
pub struct EngineError {
    pub kind: EngineErrorKind
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError: {}", self.kind)
    }
}

impl Error for EngineError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum EngineErrorKind {
    Arrow(ArrowError),
    ColumnNotFound { column_name: String },
    ColumnTypeMismatch {
        column_name: String,
        expected: &'static str,
        found: DataType,
    },
    Decode { column_name: String, type_name: String, source: sqlx::Error },
    MissingConnectionString(&'static str),
    Spark(spark_connect::SparkError),
    SQLX(sqlx::Error),
    WrongContext { engine: &'static str, expected: ContextKind },
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrow(e) => write!(f, "Arrow error: {e}"),
            Self::ColumnNotFound { column_name } => write!(f, "Column '{column_name}' not found"),
            Self::ColumnTypeMismatch { column_name, expected, found } => {
                write!(f, "Column '{column_name}' has mismatched type: expected {expected}, found {found:?}")
            },
            Self::Decode { column_name, type_name, .. } => {
                write!(f, "Failed to decode column '{column_name}' of type {type_name}")
            },
            Self::MissingConnectionString(engine) => {
                write!(f, "The {engine} engine requires a connection string (--db)")
            },
            Self::Spark(e) => write!(f, "{e}"),
            Self::SQLX(e) => write!(f, "{e}"),
            Self::WrongContext { engine, expected } => {
                write!(f, "The {engine} engine cannot serve a {expected:?} context")
            },
        }
    }
}

impl Error for EngineErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Arrow(source) => Some(source),
			Self::Decode { source, .. } => Some(source),
			Self::SQLX(source) => Some(source),
			Self::Spark(source) => Some(source),
			_ => None,
		}
	}
}

impl From<ArrowError> for EngineError {
    fn from(error: ArrowError) -> Self {
        EngineError { kind: EngineErrorKind::Arrow(error) }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(error: sqlx::Error) -> Self {
        EngineError { kind: EngineErrorKind::SQLX(error) }
    }
}

impl From<spark_connect::SparkError> for EngineError {
    fn from(error: spark_connect::SparkError) -> Self {
        EngineError { kind: EngineErrorKind::Spark(error) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn engine_error_display_formats_correctly() {
        let cases: Vec<(EngineErrorKind, &str)> = vec![
            (
                EngineErrorKind::Arrow(ArrowError::SchemaError("bad schema".into())),
                "Arrow error",
            ),
            (
                EngineErrorKind::Decode {
                    column_name: "amount".into(),
                    type_name: "NUMERIC".into(),
                    source: sqlx::Error::RowNotFound,
                },
                "Failed to decode column 'amount' of type NUMERIC",
            ),
            (
                EngineErrorKind::ColumnTypeMismatch {
                    column_name: "name".into(),
                    expected: "numeric",
                    found: DataType::Utf8,
                },
                "Column 'name' has mismatched type",
            ),
            (EngineErrorKind::ColumnNotFound { column_name: "ghost".into() }, "Column 'ghost' not found"),
            (EngineErrorKind::MissingConnectionString("spark"), "requires a connection string"),
            (EngineErrorKind::SQLX(sqlx::Error::RowNotFound), "no rows returned"),
        ];

        for (kind, expect) in cases {
            let text = kind.to_string();
            assert!(
                text.contains(expect),
                "Expected `{}` in `{}`",
                expect,
                text
            );
        }
    }

    #[test]
    fn engine_error_source_is_accessible() {
        let kind = EngineErrorKind::Decode {
            column_name: "id".into(),
            type_name: "INT8".into(),
            source: sqlx::Error::RowNotFound,
        };
        let src = kind.source().unwrap().to_string();
        assert!(src.contains("no rows returned"));
    }

    #[test]
    fn engine_error_from_conversions() {
        let e1: EngineError = sqlx::Error::RowNotFound.into();
        let e2: EngineError = ArrowError::ComputeError("overflow".into()).into();

        assert!(matches!(e1.kind, EngineErrorKind::SQLX(_)));
        assert!(matches!(e2.kind, EngineErrorKind::Arrow(_)));
    }
}
