use class_file::class_file_error::ClassFileError;
use thiserror::Error;

/// Failures are scoped to a single field; none of them aborts a batch.
#[derive(Error, Debug, PartialEq)]
pub enum GenError {
    #[error("UnsupportedTypeKind {0}")]
    UnsupportedTypeKind(String),
    #[error("InvalidFieldName {0}")]
    InvalidFieldName(String),
    #[error("ClassFormatError {0}")]
    ClassFormat(#[from] ClassFileError),
    #[error("SinkWriteFailure {0}: {1}")]
    SinkWriteFailure(String, String),
}

pub type GenResult<T> = Result<T, GenError>;
