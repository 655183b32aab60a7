//! The `ContainerLayer` trait and the data model it exchanges.

use std::path::Path;

use crate::error::ContainerError;

/// Opaque handle to a node (dataset or group) inside a container.
///
/// Handles returned by [`ContainerLayer::open_dataset`],
/// [`ContainerLayer::open_group`] and [`ContainerLayer::dereference`] must be
/// released with [`ContainerLayer::close_node`] once the caller is done with
/// them, on every exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// An object-reference token stored inside a reference dataset.
///
/// A token of all-FF bytes is a null (unset) reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefToken(pub u64);

impl RefToken {
    /// The null (unset) reference.
    pub const NULL: RefToken = RefToken(u64::MAX);

    /// Returns `true` if this is a null (unset) reference.
    pub fn is_null(&self) -> bool {
        self.0 == u64::MAX
    }
}

/// Storage element type of a numeric payload, as the container stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl StorageType {
    /// Element size in bytes.
    pub fn size(&self) -> usize {
        match self {
            StorageType::I8 | StorageType::U8 => 1,
            StorageType::I16 | StorageType::U16 => 2,
            StorageType::I32 | StorageType::U32 | StorageType::F32 => 4,
            StorageType::I64 | StorageType::U64 | StorageType::F64 => 8,
        }
    }

    /// Short type name, e.g. `"u16"`.
    pub fn name(&self) -> &'static str {
        match self {
            StorageType::I8 => "i8",
            StorageType::I16 => "i16",
            StorageType::I32 => "i32",
            StorageType::I64 => "i64",
            StorageType::U8 => "u8",
            StorageType::U16 => "u16",
            StorageType::U32 => "u32",
            StorageType::U64 => "u64",
            StorageType::F32 => "f32",
            StorageType::F64 => "f64",
        }
    }
}

/// Raw payload of a dataset, as handed over by the container layer.
///
/// Numeric payloads carry little-endian element bytes plus the storage type;
/// decoding them into typed values is the decoder's job, not the
/// container's.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// Flat little-endian element bytes.
    Numeric {
        dtype: StorageType,
        shape: Vec<u64>,
        bytes: Vec<u8>,
    },
    /// A record payload: ordered named sub-payloads.  The two-field
    /// `{real, imag}` form is the container convention for complex numbers.
    Compound { fields: Vec<(String, RawData)> },
    /// Object-reference storage: one token per element.
    Refs {
        shape: Vec<u64>,
        tokens: Vec<RefToken>,
    },
}

impl RawData {
    /// Number of elements implied by the payload's shape.
    pub fn num_elements(&self) -> u64 {
        match self {
            RawData::Numeric { shape, .. } | RawData::Refs { shape, .. } => {
                shape.iter().product()
            }
            RawData::Compound { .. } => 1,
        }
    }
}

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    I64Array(Vec<i64>),
    F64Array(Vec<f64>),
    StringArray(Vec<String>),
}

impl AttrValue {
    /// Returns the string value, if this is a `String` attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string-array value, if this is a `StringArray` attribute.
    pub fn as_str_array(&self) -> Option<&[String]> {
        match self {
            AttrValue::StringArray(v) => Some(v),
            _ => None,
        }
    }
}

/// One child of a group: its name plus the names of its attributes.
#[derive(Debug, Clone)]
pub struct ChildEntry {
    pub name: String,
    pub attrs: Vec<String>,
}

impl ChildEntry {
    /// Returns `true` when the child carries the named attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a == name)
    }
}

/// Listing of a group's children, split by node kind.
///
/// Within each kind the entries appear in the container's insertion order;
/// no sorting is applied.
#[derive(Debug, Clone, Default)]
pub struct ChildListing {
    pub datasets: Vec<ChildEntry>,
    pub groups: Vec<ChildEntry>,
}

/// Capability interface to a hierarchical attribute-annotated container.
///
/// Backends expose exactly the operations the decoder consumes: child
/// enumeration, scoped dataset/group handles, attribute reads, raw payload
/// reads, and object-reference resolution.  Methods a backend cannot
/// provide may return [`ContainerError::Unsupported`]; [`open`] defaults to
/// that so purely in-memory backends need not implement it.
///
/// [`open`]: ContainerLayer::open
pub trait ContainerLayer: Sized {
    /// Open a container from a filesystem path.
    fn open(path: &Path) -> Result<Self, ContainerError> {
        Err(ContainerError::Unsupported(format!(
            "open({})",
            path.display()
        )))
    }

    /// The root group node.  The root is always open; it is not closed.
    fn root(&self) -> NodeId;

    /// List the named children of a group node.
    fn list_children(&self, node: NodeId) -> Result<ChildListing, ContainerError>;

    /// Open a dataset child by name.  The returned handle must be released
    /// with [`close_node`](ContainerLayer::close_node).
    fn open_dataset(&self, parent: NodeId, name: &str) -> Result<NodeId, ContainerError>;

    /// Open a group child by name.  The returned handle must be released
    /// with [`close_node`](ContainerLayer::close_node).
    fn open_group(&self, parent: NodeId, name: &str) -> Result<NodeId, ContainerError>;

    /// Release a handle obtained from `open_dataset`, `open_group` or
    /// `dereference`.
    fn close_node(&self, node: NodeId);

    /// Read a named attribute of a node.
    ///
    /// Fails with [`ContainerError::AttributeMissing`] when the attribute
    /// does not exist, distinctly from other failures.
    fn read_attribute(&self, node: NodeId, name: &str) -> Result<AttrValue, ContainerError>;

    /// Read a dataset's raw payload.
    ///
    /// Fails with [`ContainerError::NotADataset`] when the node is a group.
    fn read_raw(&self, node: NodeId) -> Result<RawData, ContainerError>;

    /// Resolve an object reference read from `node` to the node it points
    /// at.  The returned handle must be released with
    /// [`close_node`](ContainerLayer::close_node).
    fn dereference(&self, node: NodeId, token: RefToken) -> Result<NodeId, ContainerError>;
}
