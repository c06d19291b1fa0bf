//! Error types for property reconciliation and the bootstrap run

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Remediation shown when the analysis server is older than the supported minimum
pub const UNSUPPORTED_SERVER_MESSAGE: &str =
    "With SonarQube server prior to 5.6, use sonar-maven-plugin <= 3.3";

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Build session does not declare a top level project")]
    NoTopLevelProject,

    #[error("{}", UNSUPPORTED_SERVER_MESSAGE)]
    UnsupportedServer { server_version: Option<String> },

    #[error("Path {path} is not located under base directory {base}")]
    PathOutsideBase { path: PathBuf, base: PathBuf },

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse project snapshot {path}: {message}")]
    SnapshotParse { path: PathBuf, message: String },

    #[error("Analysis engine failure: {0}")]
    Engine(String),

    /// Wraps any fatal failure raised while executing a bootstrap run
    #[error("{message}")]
    Execution {
        message: String,
        #[source]
        source: Box<BridgeError>,
    },
}

impl BridgeError {
    /// Wraps `cause` so its message is the one the caller sees
    pub fn execution(cause: BridgeError) -> Self {
        BridgeError::Execution {
            message: cause.to_string(),
            source: Box::new(cause),
        }
    }
}
