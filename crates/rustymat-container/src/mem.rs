//! In-memory container backend.
//!
//! [`MemContainer`] serves already-structured nodes from an arena, standing
//! in for a byte-level HDF5 backend behind the same [`ContainerLayer`]
//! trait.  Fixtures are assembled with [`MemBuilder`], then frozen with
//! [`MemBuilder::finish`].
//!
//! The backend keeps two counters that tests lean on: the number of
//! currently open node handles (every `open_*`/`dereference` increments,
//! every `close_node` decrements) and the number of raw dataset reads.

use std::cell::Cell;

use crate::error::ContainerError;
use crate::layer::{
    AttrValue, ChildEntry, ChildListing, ContainerLayer, NodeId, RawData, RefToken,
};

enum MemNode {
    Dataset {
        attrs: Vec<(String, AttrValue)>,
        raw: RawData,
    },
    Group {
        attrs: Vec<(String, AttrValue)>,
        children: Vec<(String, usize)>,
    },
}

impl MemNode {
    fn attrs(&self) -> &[(String, AttrValue)] {
        match self {
            MemNode::Dataset { attrs, .. } | MemNode::Group { attrs, .. } => attrs,
        }
    }
}

/// Handle to a node under construction in a [`MemBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildNode(usize);

/// Builder for [`MemContainer`] fixtures.
///
/// Nodes are created under an implicit root group.  Detached nodes (created
/// with [`detached_dataset`](MemBuilder::detached_dataset) or
/// [`detached_group`](MemBuilder::detached_group)) have no parent and are
/// only reachable through object references, the way reference targets live
/// outside the visible tree in a v7.3 file.
///
/// # Panics
///
/// Attaching a child to a dataset node panics; datasets are leaves.
pub struct MemBuilder {
    nodes: Vec<MemNode>,
}

impl MemBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![MemNode::Group {
                attrs: Vec::new(),
                children: Vec::new(),
            }],
        }
    }

    /// The root group.
    pub fn root(&self) -> BuildNode {
        BuildNode(0)
    }

    /// Create a group child under `parent`.
    pub fn add_group(&mut self, parent: BuildNode, name: &str) -> BuildNode {
        let idx = self.push(MemNode::Group {
            attrs: Vec::new(),
            children: Vec::new(),
        });
        self.attach(parent, name, idx);
        BuildNode(idx)
    }

    /// Create a dataset child under `parent` with the given raw payload.
    pub fn add_dataset(&mut self, parent: BuildNode, name: &str, raw: RawData) -> BuildNode {
        let idx = self.push(MemNode::Dataset {
            attrs: Vec::new(),
            raw,
        });
        self.attach(parent, name, idx);
        BuildNode(idx)
    }

    /// Create a dataset with no parent, reachable only by reference.
    pub fn detached_dataset(&mut self, raw: RawData) -> BuildNode {
        let idx = self.push(MemNode::Dataset {
            attrs: Vec::new(),
            raw,
        });
        BuildNode(idx)
    }

    /// Create a group with no parent, reachable only by reference.
    pub fn detached_group(&mut self) -> BuildNode {
        let idx = self.push(MemNode::Group {
            attrs: Vec::new(),
            children: Vec::new(),
        });
        BuildNode(idx)
    }

    /// Set an attribute on a node, replacing any previous value.
    pub fn set_attr(&mut self, node: BuildNode, name: &str, value: AttrValue) {
        let attrs = match &mut self.nodes[node.0] {
            MemNode::Dataset { attrs, .. } | MemNode::Group { attrs, .. } => attrs,
        };
        if let Some(slot) = attrs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            attrs.push((name.to_string(), value));
        }
    }

    /// An object-reference token pointing at `node`.
    pub fn ref_to(&self, node: BuildNode) -> RefToken {
        RefToken(node.0 as u64)
    }

    /// A token that resolves to no node, for failure-path fixtures.
    pub fn dangling_ref(&self) -> RefToken {
        RefToken(self.nodes.len() as u64 + 1000)
    }

    /// Freeze the tree into a servable container.
    pub fn finish(self) -> MemContainer {
        MemContainer {
            nodes: self.nodes,
            open_handles: Cell::new(0),
            dataset_reads: Cell::new(0),
        }
    }

    fn push(&mut self, node: MemNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: BuildNode, name: &str, child: usize) {
        match &mut self.nodes[parent.0] {
            MemNode::Group { children, .. } => children.push((name.to_string(), child)),
            MemNode::Dataset { .. } => panic!("cannot attach a child to a dataset node"),
        }
    }
}

impl Default for MemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory [`ContainerLayer`] backend.
pub struct MemContainer {
    nodes: Vec<MemNode>,
    open_handles: Cell<i64>,
    dataset_reads: Cell<u64>,
}

impl MemContainer {
    /// Start building a fixture.
    pub fn builder() -> MemBuilder {
        MemBuilder::new()
    }

    /// Number of node handles currently open.
    pub fn open_handles(&self) -> i64 {
        self.open_handles.get()
    }

    /// Number of raw dataset reads served so far.
    pub fn dataset_reads(&self) -> u64 {
        self.dataset_reads.get()
    }

    fn node(&self, id: NodeId) -> Result<&MemNode, ContainerError> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(ContainerError::InvalidHandle(id.0))
    }

    fn open_handle(&self, idx: usize) -> NodeId {
        self.open_handles.set(self.open_handles.get() + 1);
        NodeId(idx as u64)
    }

    fn find_child(&self, parent: NodeId, name: &str) -> Result<usize, ContainerError> {
        match self.node(parent)? {
            MemNode::Group { children, .. } => children
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, idx)| *idx)
                .ok_or_else(|| ContainerError::NotFound(name.to_string())),
            MemNode::Dataset { .. } => Err(ContainerError::NotAGroup(name.to_string())),
        }
    }
}

impl ContainerLayer for MemContainer {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn list_children(&self, node: NodeId) -> Result<ChildListing, ContainerError> {
        let children = match self.node(node)? {
            MemNode::Group { children, .. } => children,
            MemNode::Dataset { .. } => {
                return Err(ContainerError::NotAGroup(format!("node {}", node.0)))
            }
        };
        let mut listing = ChildListing::default();
        for (name, idx) in children {
            let entry = ChildEntry {
                name: name.clone(),
                attrs: self.nodes[*idx]
                    .attrs()
                    .iter()
                    .map(|(n, _)| n.clone())
                    .collect(),
            };
            match &self.nodes[*idx] {
                MemNode::Dataset { .. } => listing.datasets.push(entry),
                MemNode::Group { .. } => listing.groups.push(entry),
            }
        }
        Ok(listing)
    }

    fn open_dataset(&self, parent: NodeId, name: &str) -> Result<NodeId, ContainerError> {
        let idx = self.find_child(parent, name)?;
        match &self.nodes[idx] {
            MemNode::Dataset { .. } => Ok(self.open_handle(idx)),
            MemNode::Group { .. } => Err(ContainerError::NotADataset(name.to_string())),
        }
    }

    fn open_group(&self, parent: NodeId, name: &str) -> Result<NodeId, ContainerError> {
        let idx = self.find_child(parent, name)?;
        match &self.nodes[idx] {
            MemNode::Group { .. } => Ok(self.open_handle(idx)),
            MemNode::Dataset { .. } => Err(ContainerError::NotAGroup(name.to_string())),
        }
    }

    fn close_node(&self, _node: NodeId) {
        self.open_handles.set(self.open_handles.get() - 1);
    }

    fn read_attribute(&self, node: NodeId, name: &str) -> Result<AttrValue, ContainerError> {
        self.node(node)?
            .attrs()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| ContainerError::AttributeMissing(name.to_string()))
    }

    fn read_raw(&self, node: NodeId) -> Result<RawData, ContainerError> {
        match self.node(node)? {
            MemNode::Dataset { raw, .. } => {
                self.dataset_reads.set(self.dataset_reads.get() + 1);
                Ok(raw.clone())
            }
            MemNode::Group { .. } => Err(ContainerError::NotADataset(format!("node {}", node.0))),
        }
    }

    fn dereference(&self, _node: NodeId, token: RefToken) -> Result<NodeId, ContainerError> {
        let idx = token.0 as usize;
        if token.is_null() || idx >= self.nodes.len() {
            return Err(ContainerError::DanglingReference(token.0));
        }
        Ok(self.open_handle(idx))
    }
}

impl std::fmt::Debug for MemContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemContainer")
            .field("nodes", &self.nodes.len())
            .field("open_handles", &self.open_handles.get())
            .finish()
    }
}
