//! Error handling for the kindle-common crate.

use thiserror::Error;

/// Error type shared by every dataset operation.
///
/// Each variant corresponds to one failure kind a caller may match on. Errors
/// are raised at the point of the offending operation; nothing is retried.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Invalid partition count {requested}: {reason}")]
    InvalidPartitionCount { requested: usize, reason: String },

    #[error("Cannot {operation} an empty dataset")]
    EmptyDataset { operation: String },

    #[error("Elements have no total order for {operation}")]
    UnorderableType { operation: String },

    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },

    #[error("Type mismatch: expected {expected}, found {found:?}")]
    TypeMismatch { expected: String, found: String },

    #[error("IO operation failed: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Result type alias for dataset operations.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// Field-less discriminant of [`DatasetError`], handy for assertions and
/// for callers that only branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPartitionCount,
    EmptyDataset,
    UnorderableType,
    ArithmeticOverflow,
    TypeMismatch,
    Io,
    Configuration,
}

impl DatasetError {
    /// Create an invalid partition count error.
    pub fn invalid_partition_count<S: Into<String>>(requested: usize, reason: S) -> Self {
        Self::InvalidPartitionCount {
            requested,
            reason: reason.into(),
        }
    }

    /// Create an empty dataset error for the named operation.
    pub fn empty_dataset<S: Into<String>>(operation: S) -> Self {
        Self::EmptyDataset {
            operation: operation.into(),
        }
    }

    /// Create an unorderable type error for the named operation.
    pub fn unorderable<S: Into<String>>(operation: S) -> Self {
        Self::UnorderableType {
            operation: operation.into(),
        }
    }

    /// Create an overflow error for the named operation.
    pub fn overflow<S: Into<String>>(operation: S) -> Self {
        Self::ArithmeticOverflow {
            operation: operation.into(),
        }
    }

    pub fn type_mismatch<E: Into<String>, F: Into<String>>(expected: E, found: F) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an IO error with a custom message.
    pub fn io_error<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an IO error with a custom message and source error.
    pub fn io_error_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a configuration error with a custom message.
    pub fn configuration_error<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with a custom message and source error.
    pub fn configuration_error_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DatasetError::InvalidPartitionCount { .. } => ErrorKind::InvalidPartitionCount,
            DatasetError::EmptyDataset { .. } => ErrorKind::EmptyDataset,
            DatasetError::UnorderableType { .. } => ErrorKind::UnorderableType,
            DatasetError::ArithmeticOverflow { .. } => ErrorKind::ArithmeticOverflow,
            DatasetError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DatasetError::Io { .. } => ErrorKind::Io,
            DatasetError::Configuration { .. } => ErrorKind::Configuration,
        }
    }
}

/// Context helpers for adding rich context to errors.
pub mod context {
    use super::*;

    /// Extension trait for turning foreign errors into [`DatasetError`]s.
    pub trait ErrorContext<T> {
        /// Wrap the error as an IO failure with the given context.
        fn with_io_context<F>(self, f: F) -> DatasetResult<T>
        where
            F: FnOnce() -> String;

        /// Wrap the error as a configuration failure with the given context.
        fn with_config_context<F>(self, f: F) -> DatasetResult<T>
        where
            F: FnOnce() -> String;
    }

    impl<T, E> ErrorContext<T> for std::result::Result<T, E>
    where
        E: Into<anyhow::Error>,
    {
        fn with_io_context<F>(self, f: F) -> DatasetResult<T>
        where
            F: FnOnce() -> String,
        {
            self.map_err(|e| DatasetError::io_error_with_source(f(), e.into()))
        }

        fn with_config_context<F>(self, f: F) -> DatasetResult<T>
        where
            F: FnOnce() -> String,
        {
            self.map_err(|e| DatasetError::configuration_error_with_source(f(), e.into()))
        }
    }
}

pub use context::ErrorContext;
