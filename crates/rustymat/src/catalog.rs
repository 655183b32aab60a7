//! The variable catalog: what "all variables" means for an open container.

use log::debug;

use rustymat_container::ContainerLayer;

use crate::class::ATTR_CLASS;
use crate::error::MatError;

/// Externally visible variable names of an open container.
///
/// Built once per opened container by filtering the root listing to
/// children that carry the class-tag attribute; internal bookkeeping nodes
/// (reference target groups and the like) carry no tag and drop out here.
/// Order is discovery order: datasets as listed, then groups as listed.
#[derive(Debug, Clone)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    pub(crate) fn build<C: ContainerLayer>(container: &C) -> Result<Self, MatError> {
        let listing = container.list_children(container.root())?;
        let names: Vec<String> = listing
            .datasets
            .iter()
            .chain(listing.groups.iter())
            .filter(|entry| entry.has_attr(ATTR_CLASS))
            .map(|entry| entry.name.clone())
            .collect();
        debug!("catalog: {} variable(s)", names.len());
        Ok(Self { names })
    }

    /// Variable names in discovery order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a name is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
