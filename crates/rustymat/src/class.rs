//! The v7.3 class-tag vocabulary and the class resolver.

use std::fmt;

use rustymat_container::{ContainerLayer, NodeId};

/// Attribute carrying a node's declared logical class.
pub(crate) const ATTR_CLASS: &str = "MATLAB_class";
/// Attribute marking a node whose payload is a shape vector, not data.
pub(crate) const ATTR_EMPTY: &str = "MATLAB_empty";
/// Attribute listing a struct's ordered field names.
pub(crate) const ATTR_FIELDS: &str = "MATLAB_fields";

/// Declared logical class of a container node.
///
/// The vocabulary is closed; anything else lands in
/// [`Unrecognized`](MatClass::Unrecognized) (with an empty string when the
/// class attribute is absent altogether) and is passed through rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatClass {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Double,
    Single,
    Char,
    Logical,
    Cell,
    Struct,
    Reference,
    Unrecognized(String),
}

impl MatClass {
    /// Parse a class-tag string.
    pub fn from_tag(tag: &str) -> MatClass {
        match tag {
            "int8" => MatClass::Int8,
            "int16" => MatClass::Int16,
            "int32" => MatClass::Int32,
            "int64" => MatClass::Int64,
            "uint8" => MatClass::UInt8,
            "uint16" => MatClass::UInt16,
            "uint32" => MatClass::UInt32,
            "uint64" => MatClass::UInt64,
            "double" => MatClass::Double,
            "single" => MatClass::Single,
            "char" => MatClass::Char,
            "logical" => MatClass::Logical,
            "cell" => MatClass::Cell,
            "struct" => MatClass::Struct,
            "reference" => MatClass::Reference,
            other => MatClass::Unrecognized(other.to_string()),
        }
    }

    /// An absent class tag.
    pub fn unknown() -> MatClass {
        MatClass::Unrecognized(String::new())
    }

    /// Integer classes (`int8` … `uint64`).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            MatClass::Int8
                | MatClass::Int16
                | MatClass::Int32
                | MatClass::Int64
                | MatClass::UInt8
                | MatClass::UInt16
                | MatClass::UInt32
                | MatClass::UInt64
        )
    }

    /// Floating classes (`double`, `single`).
    pub fn is_float(&self) -> bool {
        matches!(self, MatClass::Double | MatClass::Single)
    }

    /// The tag string this class parses from.
    pub fn name(&self) -> &str {
        match self {
            MatClass::Int8 => "int8",
            MatClass::Int16 => "int16",
            MatClass::Int32 => "int32",
            MatClass::Int64 => "int64",
            MatClass::UInt8 => "uint8",
            MatClass::UInt16 => "uint16",
            MatClass::UInt32 => "uint32",
            MatClass::UInt64 => "uint64",
            MatClass::Double => "double",
            MatClass::Single => "single",
            MatClass::Char => "char",
            MatClass::Logical => "logical",
            MatClass::Cell => "cell",
            MatClass::Struct => "struct",
            MatClass::Reference => "reference",
            MatClass::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for MatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let MatClass::Unrecognized(tag) = self {
            if tag.is_empty() {
                return write!(f, "<untagged>");
            }
        }
        write!(f, "{}", self.name())
    }
}

/// Read a node's declared class.
///
/// Absence of the class attribute, or any failure reading it, degrades to
/// [`MatClass::unknown`] — a malformed node must not abort a multi-variable
/// read.
pub(crate) fn resolve_class<C: ContainerLayer>(container: &C, node: NodeId) -> MatClass {
    match container.read_attribute(node, ATTR_CLASS) {
        Ok(value) => value
            .as_str()
            .map(MatClass::from_tag)
            .unwrap_or_else(MatClass::unknown),
        Err(_) => MatClass::unknown(),
    }
}

/// Whether the node carries the empty marker.
pub(crate) fn empty_marked<C: ContainerLayer>(container: &C, node: NodeId) -> bool {
    container.read_attribute(node, ATTR_EMPTY).is_ok()
}
