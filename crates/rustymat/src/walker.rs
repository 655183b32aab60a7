//! Name resolution and traversal over a container scope.

use log::debug;

use rustymat_container::{ContainerError, ContainerLayer, NodeId};

use crate::class::{empty_marked, resolve_class};
use crate::error::MatError;
use crate::reinterpret;
use crate::value::{Value, VarMap};

/// RAII guard over a container node handle.
///
/// Every handle the walker or the reinterpreter opens lives inside one of
/// these, so it is closed on every exit path — early `?` returns from deep
/// recursion included.
pub(crate) struct ScopedNode<'c, C: ContainerLayer> {
    container: &'c C,
    id: NodeId,
}

impl<'c, C: ContainerLayer> ScopedNode<'c, C> {
    pub(crate) fn acquire(container: &'c C, id: NodeId) -> Self {
        Self { container, id }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }
}

impl<C: ContainerLayer> Drop for ScopedNode<'_, C> {
    fn drop(&mut self) {
        self.container.close_node(self.id);
    }
}

/// Read a set of names within a scope, preserving request order.
///
/// Any failure is attributed to the requested name it occurred under.
pub(crate) fn read_vars<C: ContainerLayer>(
    container: &C,
    scope: NodeId,
    names: &[&str],
) -> Result<VarMap, MatError> {
    let mut out = VarMap::new();
    for name in names {
        let value =
            read_path(container, scope, name).map_err(|e| MatError::in_variable(name, e))?;
        out.insert((*name).to_string(), value);
    }
    Ok(out)
}

/// Read a possibly `/`-qualified name, descending group scopes.
pub(crate) fn read_path<C: ContainerLayer>(
    container: &C,
    scope: NodeId,
    path: &str,
) -> Result<Value, MatError> {
    match path.split_once('/') {
        None => read_one(container, scope, path),
        Some((head, rest)) => {
            let group = ScopedNode::acquire(container, container.open_group(scope, head)?);
            read_path(container, group.id(), rest)
        }
    }
}

/// Resolve one name within a scope and reinterpret it.
///
/// A name is tried as a dataset first, then as a group; a name present as
/// neither is a hard error naming the variable.
pub(crate) fn read_one<C: ContainerLayer>(
    container: &C,
    scope: NodeId,
    name: &str,
) -> Result<Value, MatError> {
    match container.open_dataset(scope, name) {
        Ok(id) => {
            let dataset = ScopedNode::acquire(container, id);
            let class = resolve_class(container, dataset.id());
            let empty = empty_marked(container, dataset.id());
            debug!("reading dataset `{name}` as {class}");
            reinterpret::reinterpret_node(container, dataset.id(), &class, empty)
        }
        Err(ContainerError::NotADataset(_)) | Err(ContainerError::NotFound(_)) => {
            match container.open_group(scope, name) {
                Ok(id) => {
                    let group = ScopedNode::acquire(container, id);
                    let class = resolve_class(container, group.id());
                    let empty = empty_marked(container, group.id());
                    debug!("reading group `{name}` as {class}");
                    reinterpret::reinterpret_group(container, group.id(), &class, empty)
                }
                Err(ContainerError::NotFound(_)) | Err(ContainerError::NotAGroup(_)) => {
                    Err(MatError::UnknownVariable(name.to_string()))
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Read a struct's ordered field list within the struct group's own scope.
pub(crate) fn read_fields<C: ContainerLayer>(
    container: &C,
    scope: NodeId,
    names: &[String],
) -> Result<Vec<(String, Value)>, MatError> {
    let mut fields = Vec::with_capacity(names.len());
    for name in names {
        let value =
            read_one(container, scope, name).map_err(|e| MatError::in_variable(name, e))?;
        fields.push((name.clone(), value));
    }
    Ok(fields)
}
