//! Container capability layer for the rustymat decoder.
//!
//! The decoder in the `rustymat` crate never touches bytes of an HDF5 file
//! directly.  Everything it needs from the underlying container — listing
//! children, opening dataset and group handles, reading attributes and raw
//! payloads, resolving object references — goes through the
//! [`ContainerLayer`] trait defined here.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────┐
//! │  rustymat decoder         │
//! ├───────────────────────────┤
//! │     ContainerLayer        │  ← trait defined here
//! ├────────────┬──────────────┤
//! │ MemContainer │ HDF5 layer │  ← pluggable backends
//! └────────────┴──────────────┘
//! ```
//!
//! [`MemContainer`] is the in-memory backend shipped with this crate.  It
//! stores already-structured nodes and is used by the decoder's tests and
//! benches; a byte-level HDF5 backend plugs in behind the same trait.

pub mod error;
pub mod layer;
pub mod mem;

pub use error::ContainerError;
pub use layer::{
    AttrValue, ChildEntry, ChildListing, ContainerLayer, NodeId, RawData, RefToken, StorageType,
};
pub use mem::{BuildNode, MemBuilder, MemContainer};
