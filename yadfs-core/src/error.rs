use thiserror::Error;

pub type Result<T> = std::result::Result<T, YadfsError>;

#[derive(Error, Debug)]
pub enum YadfsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Master {operation} failed for {path}: status={status} {message}")]
    Master {
        operation: &'static str,
        path: String,
        status: u16,
        message: String,
    },

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Replica {mode} failed for {file_id}: {message}")]
    Replica {
        mode: &'static str,
        file_id: String,
        message: String,
    },

    #[error("Insufficient replicas for {file_id}: need {required}, acknowledged {found}")]
    InsufficientReplicas {
        file_id: String,
        required: usize,
        found: usize,
    },

    #[error("File {path} was allocated as {file_id} but its bytes were not stored: {source}")]
    UnwrittenAllocation {
        path: String,
        file_id: String,
        #[source]
        source: Box<YadfsError>,
    },

    #[error("Invalid arguments for {command}: {message}")]
    InvalidArguments { command: String, message: String },

    #[error("Cannot remove '{0}': it is a prefix of the current working directory")]
    GuardRejected(String),

    #[error("Local filesystem error on '{path}': {source}")]
    LocalIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Closed classification of failures surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    ReplicaFailure,
    ValidationError,
    LocalIoError,
    GuardRejection,
    Unclassified,
}

impl YadfsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            YadfsError::NotFound(_) => FailureKind::NotFound,
            YadfsError::Replica { .. }
            | YadfsError::InsufficientReplicas { .. }
            | YadfsError::UnwrittenAllocation { .. } => FailureKind::ReplicaFailure,
            YadfsError::InvalidArguments { .. } => FailureKind::ValidationError,
            YadfsError::LocalIo { .. } => FailureKind::LocalIoError,
            YadfsError::GuardRejected(_) => FailureKind::GuardRejection,
            YadfsError::Io(_)
            | YadfsError::Serialization(_)
            | YadfsError::Config(_)
            | YadfsError::Http(_)
            | YadfsError::Master { .. }
            | YadfsError::Internal(_) => FailureKind::Unclassified,
        }
    }

    pub fn local_io(path: impl Into<String>, source: std::io::Error) -> Self {
        YadfsError::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_arguments(command: impl Into<String>, message: impl Into<String>) -> Self {
        YadfsError::InvalidArguments {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for YadfsError {
    fn from(err: reqwest::Error) -> Self {
        YadfsError::Http(err.to_string())
    }
}
