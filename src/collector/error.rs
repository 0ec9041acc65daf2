//! Error type for collection failures.

use std::io;
use std::time::Duration;

use crate::collector::procfs::parser::ParseError;
use crate::metrics::RegistryError;

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// I/O error reading a file or socket.
    Io(io::Error),
    /// Could not resolve or connect to a remote endpoint.
    Connect { address: String, source: io::Error },
    /// The read deadline expired before the document was complete.
    Timeout(Duration),
    /// Malformed text structure or numeric conversion failure.
    Parse(String),
    /// Malformed XML or a document not matching the expected schema.
    Decode(String),
    /// The gauge registry rejected a descriptor or value.
    Registry(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Connect { address, source } => {
                write!(f, "can't connect to {}: {}", address, source)
            }
            CollectError::Timeout(d) => write!(f, "read deadline of {:?} exceeded", d),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::Decode(msg) => write!(f, "couldn't parse xml: {}", msg),
            CollectError::Registry(msg) => write!(f, "registry error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Io(e) => Some(e),
            CollectError::Connect { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e.message)
    }
}

impl From<RegistryError> for CollectError {
    fn from(e: RegistryError) -> Self {
        CollectError::Registry(e.message)
    }
}
