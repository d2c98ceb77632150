//! Error taxonomy shared by every reader and writer in this crate.
//!
//! Every variant is fatal to the call that produced it: readers never hand
//! back a partially decoded scene.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshIoError {
    #[error("Invalid header (line {line}): {message}")]
    InvalidHeader { line: usize, message: String },

    #[error("Unknown PLY type: {0}")]
    UnknownType(String),

    #[error("Unsupported representation: {0} format is not currently supported")]
    UnsupportedRepresentation(String),

    #[error("Truncated record stream in element '{element}': {message}")]
    TruncatedRecord { element: String, message: String },

    #[error("Unexpected end of file in element '{element}' at record {record}")]
    UnexpectedEndOfFile { element: String, record: usize },

    #[error("Unexpected arity in {context}: {found}")]
    UnexpectedArity { context: String, found: usize },

    #[error("Invalid token '{token}': {message}")]
    InvalidToken { token: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory \"{}\" does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("File \"{}\" already exists and overwrite was not requested", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),
}

pub type Result<T> = std::result::Result<T, MeshIoError>;

impl MeshIoError {
    pub(crate) fn header(line: usize, message: impl Into<String>) -> Self {
        MeshIoError::InvalidHeader {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn truncated(element: &str, message: impl Into<String>) -> Self {
        MeshIoError::TruncatedRecord {
            element: element.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn token(token: &str, message: impl Into<String>) -> Self {
        MeshIoError::InvalidToken {
            token: token.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = MeshIoError::header(4, "property before element");
        assert_eq!(err.to_string(), "Invalid header (line 4): property before element");

        let err = MeshIoError::UnsupportedRepresentation("binary_big_endian".into());
        assert!(err.to_string().contains("binary_big_endian"));

        let err = MeshIoError::DirectoryNotFound(PathBuf::from("/no/such/dir"));
        assert_eq!(err.to_string(), "Directory \"/no/such/dir\" does not exist");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: MeshIoError = io_err.into();
        assert!(matches!(err, MeshIoError::Io(_)));
    }
}
