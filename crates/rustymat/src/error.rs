//! Error type for the decoder.

use rustymat_container::ContainerError;

/// Errors that can occur while decoding variables from a container.
#[derive(Debug, thiserror::Error)]
pub enum MatError {
    /// Failure reported by the container layer.
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// The given path is empty.
    #[error("path is empty")]
    EmptyPath,

    /// An explicit variable selection contained no names.
    #[error("variable selection is empty")]
    EmptySelection,

    /// A requested name is not in the catalog (or not a child of its scope).
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// Any failure inside a named variable, attributed to that name.
    #[error("while decoding `{name}`: {source}")]
    Variable {
        name: String,
        #[source]
        source: Box<MatError>,
    },

    /// A numeric payload is not a whole number of storage elements.
    #[error("payload of {actual} bytes is not a whole number of {dtype} elements")]
    PayloadSize { dtype: &'static str, actual: usize },

    /// Element count disagrees with the declared shape.
    #[error("element count {actual} does not match shape {shape:?} ({expected} elements)")]
    ShapeMismatch {
        shape: Vec<u64>,
        expected: u64,
        actual: usize,
    },

    /// A null (unset) object reference inside a reference array.
    #[error("null object reference at element {index}")]
    NullReference { index: usize },

    /// An empty-marked payload that does not encode a dimension vector.
    #[error("empty-marked payload does not encode a dimension vector")]
    BadDimsPayload,
}

impl MatError {
    /// Wrap a failure so diagnostics name the variable it came from.
    pub(crate) fn in_variable(name: &str, source: MatError) -> MatError {
        MatError::Variable {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

/// Convenience `Result` alias using [`MatError`].
pub type Result<T> = std::result::Result<T, MatError>;
