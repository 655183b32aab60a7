//! Public reading surface: `MatFile` and the one-shot `read` entry point.

use std::path::Path;

use log::debug;

use rustymat_container::ContainerLayer;

use crate::catalog::Catalog;
use crate::error::MatError;
use crate::value::VarMap;
use crate::walker;

/// Which variables a read should produce.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Every catalog-discovered variable.
    All,
    /// An explicit, non-empty list of names.
    Names(Vec<String>),
}

/// An open v7.3 container with its variable catalog.
///
/// The catalog is built once at open and owned here; the underlying
/// container resource is released when the `MatFile` drops.
pub struct MatFile<C: ContainerLayer> {
    container: C,
    catalog: Catalog,
}

impl<C: ContainerLayer> MatFile<C> {
    /// Open a container from a filesystem path and build its catalog.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MatError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MatError::EmptyPath);
        }
        Self::from_container(C::open(path)?)
    }

    /// Wrap an already-open container (e.g. an in-memory backend).
    pub fn from_container(container: C) -> Result<Self, MatError> {
        let catalog = Catalog::build(&container)?;
        Ok(Self { container, catalog })
    }

    /// The variable catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog names in discovery order.
    pub fn names(&self) -> &[String] {
        self.catalog.names()
    }

    /// The underlying container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Read every catalog variable.
    pub fn read_all(&self) -> Result<VarMap, MatError> {
        let names: Vec<&str> = self.catalog.names().iter().map(String::as_str).collect();
        walker::read_vars(&self.container, self.container.root(), &names)
    }

    /// Read an explicit set of names, in the requested order.
    ///
    /// Names may be `/`-qualified to reach inside structs.  Every leading
    /// component is validated against the catalog before any decoding
    /// begins, so an unknown name fails the call without partial work.
    pub fn read(&self, names: &[&str]) -> Result<VarMap, MatError> {
        if names.is_empty() {
            return Err(MatError::EmptySelection);
        }
        for name in names {
            let head = name.split('/').next().unwrap_or(name);
            if head.is_empty() || !self.catalog.contains(head) {
                return Err(MatError::UnknownVariable((*name).to_string()));
            }
        }
        debug!("reading {} variable(s)", names.len());
        walker::read_vars(&self.container, self.container.root(), names)
    }

    /// Read per a [`Selection`].
    pub fn read_selection(&self, selection: &Selection) -> Result<VarMap, MatError> {
        match selection {
            Selection::All => self.read_all(),
            Selection::Names(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                self.read(&names)
            }
        }
    }
}

impl<C: ContainerLayer> std::fmt::Debug for MatFile<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatFile")
            .field("variables", &self.catalog.len())
            .finish()
    }
}

/// Open `path` through the container backend `C`, read `selection`, and
/// release the container on every exit path.
pub fn read<C, P>(path: P, selection: &Selection) -> Result<VarMap, MatError>
where
    C: ContainerLayer,
    P: AsRef<Path>,
{
    let file = MatFile::<C>::open(path)?;
    file.read_selection(selection)
}
