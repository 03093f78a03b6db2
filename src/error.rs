//! Error types for ringmend

use std::fmt;
use std::sync::Arc;

/// Result type alias for ringmend operations
pub type Result<T> = std::result::Result<T, Error>;

/// One failed connection attempt inside a failover sequence.
#[derive(Debug, Clone)]
pub struct EndpointFailure {
    /// Endpoint that was tried
    pub endpoint: String,
    /// Why the attempt failed
    pub reason: String,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

/// Error types for ringmend
#[derive(Debug)]
pub enum Error {
    /// No candidate endpoint accepted a management session
    Connection {
        cluster: String,
        attempts: Vec<EndpointFailure>,
    },
    /// Connect was cancelled by shutdown before a session was established
    Interrupted { endpoint: String },
    /// The remote engine version does not support the requested operation
    Unsupported {
        operation: String,
        version: Option<String>,
    },
    /// Session was established but the remote call itself failed
    Remote { endpoint: String, message: String },
    /// Snapshot was already removed on the node (idempotent-clear signal)
    SnapshotGone { snapshot: String },
    /// Failure propagated from a coalesced cache population; every caller
    /// that waited on the same in-flight fetch observes this same cause
    Population(Arc<Error>),
    /// Configuration errors
    Config(String),
}

impl Error {
    /// Wrap a remote-call failure for the given endpoint.
    pub fn remote(endpoint: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Remote {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Population(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection { cluster, attempts } => {
                write!(f, "no reachable endpoint in cluster '{}' (", cluster)?;
                for (i, attempt) in attempts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", attempt)?;
                }
                write!(f, ")")
            }
            Error::Interrupted { endpoint } => {
                write!(f, "connect to {} interrupted by shutdown", endpoint)
            }
            Error::Unsupported { operation, version } => match version {
                Some(v) => write!(f, "operation '{}' unsupported on engine {}", operation, v),
                None => write!(f, "operation '{}' unsupported on this engine", operation),
            },
            Error::Remote { endpoint, message } => {
                write!(f, "remote call on {} failed: {}", endpoint, message)
            }
            Error::SnapshotGone { snapshot } => {
                write!(f, "snapshot '{}' already cleared", snapshot)
            }
            Error::Population(inner) => write!(f, "cache population failed: {}", inner),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl From<Arc<Error>> for Error {
    fn from(inner: Arc<Error>) -> Self {
        Error::Population(inner)
    }
}
