//! Error type for container-layer operations.

use std::fmt;
use std::io;

/// Errors that can occur inside a container backend.
#[derive(Debug)]
pub enum ContainerError {
    /// I/O error from the underlying storage.
    Io(io::Error),
    /// No child with the given name exists in the scope.
    NotFound(String),
    /// The named child exists but is not a dataset.
    NotADataset(String),
    /// The named child exists but is not a group.
    NotAGroup(String),
    /// The requested attribute does not exist on the node.
    AttributeMissing(String),
    /// A node handle does not refer to a live node.
    InvalidHandle(u64),
    /// An object reference does not resolve to any node.
    DanglingReference(u64),
    /// The backend does not support the requested operation.
    Unsupported(String),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Io(e) => write!(f, "container I/O error: {e}"),
            ContainerError::NotFound(name) => write!(f, "no such child: {name}"),
            ContainerError::NotADataset(name) => write!(f, "not a dataset: {name}"),
            ContainerError::NotAGroup(name) => write!(f, "not a group: {name}"),
            ContainerError::AttributeMissing(name) => write!(f, "no such attribute: {name}"),
            ContainerError::InvalidHandle(id) => write!(f, "invalid node handle: {id}"),
            ContainerError::DanglingReference(token) => {
                write!(f, "object reference {token:#x} resolves to no node")
            }
            ContainerError::Unsupported(op) => write!(f, "operation not supported: {op}"),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ContainerError {
    fn from(e: io::Error) -> Self {
        ContainerError::Io(e)
    }
}
