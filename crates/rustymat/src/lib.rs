//! Decoder for the HDF5-based "v7.3" save format of MATLAB-style numerical
//! environments, reconstructing values with the older flat "v7" semantics:
//! empty arrays, complex numbers, cell arrays, structs and struct arrays,
//! nested references.
//!
//! The decoder consumes the underlying container exclusively through the
//! [`ContainerLayer`](rustymat_container::ContainerLayer) capability trait;
//! it never parses container bytes itself.
//!
//! # Reading
//!
//! ```
//! use rustymat::{MatFile, Value};
//! use rustymat_container::{AttrValue, MemContainer, RawData, StorageType};
//!
//! let mut b = MemContainer::builder();
//! let root = b.root();
//! let ds = b.add_dataset(
//!     root,
//!     "answer",
//!     RawData::Numeric {
//!         dtype: StorageType::F64,
//!         shape: vec![1, 1],
//!         bytes: 42.0f64.to_le_bytes().to_vec(),
//!     },
//! );
//! b.set_attr(ds, "MATLAB_class", AttrValue::String("double".into()));
//!
//! let file = MatFile::from_container(b.finish()).unwrap();
//! assert_eq!(file.names(), ["answer"]);
//! let vars = file.read(&["answer"]).unwrap();
//! let answer = vars.get("answer").and_then(Value::as_numeric).unwrap();
//! assert_eq!(answer.data.to_f64_vec(), [42.0]);
//! ```
//!
//! File-backed backends implement
//! [`ContainerLayer::open`](rustymat_container::ContainerLayer::open) and go
//! through [`MatFile::open`] or the one-shot [`read`] entry point instead.

pub mod catalog;
pub mod class;
mod convert;
pub mod error;
pub mod reader;
mod reinterpret;
pub mod value;
mod walker;

pub use catalog::Catalog;
pub use class::MatClass;
pub use error::{MatError, Result};
pub use reader::{read, MatFile, Selection};
pub use value::{
    CellArray, CharArray, ComplexArray, LogicalArray, NumericArray, NumericData, StructValue,
    Value, VarMap,
};
