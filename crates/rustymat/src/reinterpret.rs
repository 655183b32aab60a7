//! The reinterpretation core: declared class + raw node content → value.
//!
//! Dataset payloads dispatch over the closed [`MatClass`] vocabulary; group
//! nodes carry the struct and group-complex conventions.  Reference storage
//! short-circuits everything else: cell arrays are physically reference
//! datasets, so reconstruction recurses through the container's dereference
//! capability regardless of the declared class.

use log::warn;

use rustymat_container::{ContainerError, ContainerLayer, NodeId, RawData, RefToken};

use crate::class::{self, MatClass, ATTR_FIELDS};
use crate::convert;
use crate::error::MatError;
use crate::value::{
    CellArray, CharArray, ComplexArray, LogicalArray, NumericArray, StructValue, Value,
};
use crate::walker::{self, ScopedNode};

/// Reinterpret a node of unknown kind: dataset first, then group.
pub(crate) fn reinterpret_node<C: ContainerLayer>(
    container: &C,
    node: NodeId,
    class: &MatClass,
    empty: bool,
) -> Result<Value, MatError> {
    match container.read_raw(node) {
        Ok(raw) => reinterpret_data(container, node, raw, class, empty),
        Err(ContainerError::NotADataset(_)) => reinterpret_group(container, node, class, empty),
        Err(e) => Err(e.into()),
    }
}

/// Reinterpret a dataset's raw payload under its declared class.
pub(crate) fn reinterpret_data<C: ContainerLayer>(
    container: &C,
    node: NodeId,
    raw: RawData,
    class: &MatClass,
    empty: bool,
) -> Result<Value, MatError> {
    // Reference storage wins over the declared class: cell arrays are
    // stored as reference datasets whatever their tag says.
    let raw = match raw {
        RawData::Refs { shape, tokens } => {
            return decode_reference_array(container, node, shape, tokens);
        }
        other => other,
    };

    match class {
        c if c.is_integer() => {
            if empty {
                return empty_numeric(c, &raw);
            }
            match raw {
                RawData::Numeric {
                    dtype,
                    shape,
                    bytes,
                } => {
                    let data = convert::decode_numeric(c, dtype, &bytes)?;
                    convert::check_shape(&shape, data.len())?;
                    Ok(Value::Numeric(NumericArray {
                        class: c.clone(),
                        shape,
                        data,
                    }))
                }
                other => {
                    warn!("class {c} with non-numeric payload; passing through");
                    Ok(Value::Raw(other))
                }
            }
        }
        MatClass::Double | MatClass::Single => {
            if empty {
                return empty_numeric(class, &raw);
            }
            match raw {
                RawData::Numeric {
                    dtype,
                    shape,
                    bytes,
                } => {
                    let data = convert::decode_numeric(class, dtype, &bytes)?;
                    convert::check_shape(&shape, data.len())?;
                    Ok(Value::Numeric(NumericArray {
                        class: class.clone(),
                        shape,
                        data,
                    }))
                }
                RawData::Compound { fields } => complex_from_compound(class, fields),
                other => {
                    warn!("class {class} with unexpected payload; passing through");
                    Ok(Value::Raw(other))
                }
            }
        }
        MatClass::Char => {
            if empty {
                let shape = convert::dims_from_payload(&raw)?;
                return Ok(Value::Char(CharArray {
                    shape,
                    units: Vec::new(),
                }));
            }
            match raw {
                RawData::Numeric {
                    dtype,
                    shape,
                    bytes,
                } => {
                    let units = convert::to_u16_units(convert::typed_elements(dtype, &bytes)?);
                    convert::check_shape(&shape, units.len())?;
                    Ok(Value::Char(CharArray { shape, units }))
                }
                other => {
                    warn!("char class with non-numeric payload; passing through");
                    Ok(Value::Raw(other))
                }
            }
        }
        MatClass::Logical => {
            if empty {
                let shape = convert::dims_from_payload(&raw)?;
                return Ok(Value::Logical(LogicalArray {
                    shape,
                    data: Vec::new(),
                }));
            }
            match raw {
                RawData::Numeric {
                    dtype,
                    shape,
                    bytes,
                } => {
                    let data = convert::to_bools(&convert::typed_elements(dtype, &bytes)?);
                    convert::check_shape(&shape, data.len())?;
                    Ok(Value::Logical(LogicalArray { shape, data }))
                }
                other => {
                    warn!("logical class with non-numeric payload; passing through");
                    Ok(Value::Raw(other))
                }
            }
        }
        MatClass::Cell => {
            if empty {
                let shape = convert::dims_from_payload(&raw)?;
                return Ok(Value::Cell(CellArray {
                    shape,
                    elements: Vec::new(),
                }));
            }
            // True cell reconstruction rides the reference path above; a
            // plain dataset tagged `cell` passes through unchanged.
            Ok(Value::Raw(raw))
        }
        MatClass::Struct => {
            if empty {
                return Ok(Value::Struct(StructValue {
                    fields: Vec::new(),
                    is_array: false,
                }));
            }
            warn!("struct class on a plain dataset; passing through");
            Ok(Value::Raw(raw))
        }
        MatClass::Reference => {
            // Declared reference class whose storage was not references.
            warn!("reference class without reference storage; passing through");
            Ok(Value::Raw(raw))
        }
        MatClass::Unrecognized(tag) => {
            if tag.is_empty() {
                warn!("node has no class tag; passing raw payload through");
            } else {
                warn!("unrecognized class tag `{tag}`; passing raw payload through");
            }
            Ok(Value::Raw(raw))
        }
        // is_integer covered the remaining variants
        _ => Ok(Value::Raw(raw)),
    }
}

/// Reinterpret a group node under its declared class.
pub(crate) fn reinterpret_group<C: ContainerLayer>(
    container: &C,
    node: NodeId,
    class: &MatClass,
    empty: bool,
) -> Result<Value, MatError> {
    match class {
        MatClass::Struct => {
            if empty {
                return Ok(Value::Struct(StructValue {
                    fields: Vec::new(),
                    is_array: false,
                }));
            }
            let field_names = match container.read_attribute(node, ATTR_FIELDS) {
                Ok(value) => value.as_str_array().map(|names| names.to_vec()),
                Err(ContainerError::AttributeMissing(_)) => None,
                Err(e) => return Err(e.into()),
            };
            match field_names {
                Some(names) => {
                    let fields = walker::read_fields(container, node, &names)?;
                    Ok(Value::Struct(flatten_struct(fields)))
                }
                None => {
                    warn!("struct group without a field list; decoding children leniently");
                    fallback_group_map(container, node)
                }
            }
        }
        MatClass::Double | MatClass::Single => {
            if let Some(value) = complex_from_children(container, node, class)? {
                return Ok(value);
            }
            if empty {
                return Ok(Value::Numeric(NumericArray {
                    class: class.clone(),
                    shape: vec![0, 0],
                    data: convert::zero_filled(class, 0),
                }));
            }
            warn!("class {class} on a group without real/imag children; decoding leniently");
            fallback_group_map(container, node)
        }
        other => {
            if let MatClass::Unrecognized(tag) = other {
                if tag.is_empty() {
                    warn!("group has no class tag; decoding children leniently");
                } else {
                    warn!("unrecognized class tag `{tag}` on group; decoding children leniently");
                }
            } else {
                warn!("class {other} on a group node; decoding children leniently");
            }
            fallback_group_map(container, node)
        }
    }
}

/// Dereference every token, reinterpret each target, collect as a cell.
///
/// Any single element failure fails the whole variable; the scoped handles
/// guarantee everything opened on the way down is closed first.
fn decode_reference_array<C: ContainerLayer>(
    container: &C,
    source: NodeId,
    shape: Vec<u64>,
    tokens: Vec<RefToken>,
) -> Result<Value, MatError> {
    convert::check_shape(&shape, tokens.len())?;
    let mut elements = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.into_iter().enumerate() {
        if token.is_null() {
            return Err(MatError::NullReference { index });
        }
        let target = ScopedNode::acquire(container, container.dereference(source, token)?);
        let class = class::resolve_class(container, target.id());
        let empty = class::empty_marked(container, target.id());
        elements.push(reinterpret_node(container, target.id(), &class, empty)?);
    }
    Ok(Value::Cell(CellArray { shape, elements }))
}

/// Zero-length array of the class, shaped by the dims-vector payload.
fn empty_numeric(class: &MatClass, raw: &RawData) -> Result<Value, MatError> {
    let shape = convert::dims_from_payload(raw)?;
    let count = shape.iter().product::<u64>() as usize;
    Ok(Value::Numeric(NumericArray {
        class: class.clone(),
        shape,
        data: convert::zero_filled(class, count),
    }))
}

/// Combine a two-field `{real, imag}` record into a complex array.
fn complex_from_compound(
    class: &MatClass,
    fields: Vec<(String, RawData)>,
) -> Result<Value, MatError> {
    let pair_ok = fields.len() == 2
        && fields.iter().any(|(name, _)| name == "real")
        && fields.iter().any(|(name, _)| name == "imag")
        && fields
            .iter()
            .all(|(_, sub)| matches!(sub, RawData::Numeric { .. }));
    if !pair_ok {
        warn!("compound payload is not a real/imag pair; passing through");
        return Ok(Value::Raw(RawData::Compound { fields }));
    }

    let mut shape = Vec::new();
    let mut real = None;
    let mut imag = None;
    for (name, sub) in fields {
        if let RawData::Numeric {
            dtype,
            shape: sub_shape,
            bytes,
        } = sub
        {
            let data = convert::decode_numeric(class, dtype, &bytes)?;
            convert::check_shape(&sub_shape, data.len())?;
            if name == "real" {
                shape = sub_shape;
                real = Some(data);
            } else {
                imag = Some(data);
            }
        }
    }
    match (real, imag) {
        (Some(real), Some(imag)) => {
            convert::check_shape(&shape, imag.len())?;
            Ok(Value::Complex(ComplexArray {
                class: class.clone(),
                shape,
                real,
                imag,
            }))
        }
        _ => unreachable!("real/imag pair was validated above"),
    }
}

/// Group-encoded complex: `real` and `imag` dataset children.
fn complex_from_children<C: ContainerLayer>(
    container: &C,
    node: NodeId,
    class: &MatClass,
) -> Result<Option<Value>, MatError> {
    let listing = container.list_children(node)?;
    let has = |name: &str| listing.datasets.iter().any(|e| e.name == name);
    if !has("real") || !has("imag") {
        return Ok(None);
    }
    let (real, shape) = match read_component(container, node, "real", class)? {
        Some(part) => part,
        None => return Ok(None),
    };
    let (imag, _) = match read_component(container, node, "imag", class)? {
        Some(part) => part,
        None => return Ok(None),
    };
    convert::check_shape(&shape, imag.len())?;
    Ok(Some(Value::Complex(ComplexArray {
        class: class.clone(),
        shape,
        real,
        imag,
    })))
}

fn read_component<C: ContainerLayer>(
    container: &C,
    parent: NodeId,
    name: &str,
    class: &MatClass,
) -> Result<Option<(crate::value::NumericData, Vec<u64>)>, MatError> {
    let ds = ScopedNode::acquire(container, container.open_dataset(parent, name)?);
    match container.read_raw(ds.id())? {
        RawData::Numeric {
            dtype,
            shape,
            bytes,
        } => {
            let data = convert::decode_numeric(class, dtype, &bytes)?;
            convert::check_shape(&shape, data.len())?;
            Ok(Some((data, shape)))
        }
        _ => Ok(None),
    }
}

/// Strict struct-array reconstruction with lenient fallback.
///
/// Strict form: every field is a cell and all cell shapes agree.  All
/// one-element cells collapse to a scalar struct (fields unwrap to their
/// single element); equal larger shapes mark a struct array.  Any other
/// arrangement returns the walked field mapping untouched.
fn flatten_struct(fields: Vec<(String, Value)>) -> StructValue {
    let mut cell_shape: Option<Vec<u64>> = None;
    let mut uniform = !fields.is_empty();
    for (_, value) in &fields {
        match value {
            Value::Cell(cell) => match &cell_shape {
                None => cell_shape = Some(cell.shape.clone()),
                Some(shape) if *shape == cell.shape => {}
                Some(_) => {
                    uniform = false;
                    break;
                }
            },
            _ => {
                uniform = false;
                break;
            }
        }
    }
    if !uniform {
        return StructValue {
            fields,
            is_array: false,
        };
    }
    let scalar = cell_shape
        .map(|shape| shape.iter().product::<u64>() == 1)
        .unwrap_or(false);
    if !scalar {
        return StructValue {
            fields,
            is_array: true,
        };
    }
    let mut flat = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        match value {
            Value::Cell(cell) => match cell.elements.into_iter().next() {
                Some(element) => flat.push((name, element)),
                None => unreachable!("scalar cell has exactly one element"),
            },
            _ => unreachable!("uniformity was checked above"),
        }
    }
    StructValue {
        fields: flat,
        is_array: false,
    }
}

/// Lenient child-by-child mapping for groups outside the conventions.
fn fallback_group_map<C: ContainerLayer>(
    container: &C,
    node: NodeId,
) -> Result<Value, MatError> {
    let listing = container.list_children(node)?;
    let mut fields = Vec::new();
    for entry in listing.datasets.iter().chain(listing.groups.iter()) {
        let value = walker::read_one(container, node, &entry.name)?;
        fields.push((entry.name.clone(), value));
    }
    Ok(Value::Struct(StructValue {
        fields,
        is_array: false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::NumericData;
    use rustymat_container::StorageType;

    fn f64_numeric(shape: Vec<u64>, values: &[f64]) -> RawData {
        RawData::Numeric {
            dtype: StorageType::F64,
            shape,
            bytes: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn scalar_cell(value: f64) -> Value {
        Value::Cell(CellArray {
            shape: vec![1, 1],
            elements: vec![Value::Numeric(NumericArray {
                class: MatClass::Double,
                shape: vec![1, 1],
                data: NumericData::F64(vec![value]),
            })],
        })
    }

    #[test]
    fn complex_compound_combines() {
        let fields = vec![
            ("real".to_string(), f64_numeric(vec![1, 1], &[3.0])),
            ("imag".to_string(), f64_numeric(vec![1, 1], &[4.0])),
        ];
        let value = complex_from_compound(&MatClass::Double, fields).unwrap();
        let cplx = value.as_complex().expect("complex");
        assert_eq!(cplx.real, NumericData::F64(vec![3.0]));
        assert_eq!(cplx.imag, NumericData::F64(vec![4.0]));
    }

    #[test]
    fn odd_compound_passes_through() {
        let fields = vec![("re".to_string(), f64_numeric(vec![1], &[3.0]))];
        let value = complex_from_compound(&MatClass::Double, fields).unwrap();
        assert!(matches!(value, Value::Raw(RawData::Compound { .. })));
    }

    #[test]
    fn flatten_scalar_struct() {
        let fields = vec![
            ("a".to_string(), scalar_cell(1.0)),
            ("b".to_string(), scalar_cell(2.0)),
        ];
        let s = flatten_struct(fields);
        assert!(!s.is_array);
        assert!(matches!(s.get("a"), Some(Value::Numeric(_))));
    }

    #[test]
    fn flatten_struct_array() {
        let two = Value::Cell(CellArray {
            shape: vec![1, 2],
            elements: vec![scalar_cell(1.0), scalar_cell(2.0)],
        });
        let fields = vec![("a".to_string(), two.clone()), ("b".to_string(), two)];
        let s = flatten_struct(fields);
        assert!(s.is_array);
        assert!(matches!(s.get("a"), Some(Value::Cell(_))));
    }

    #[test]
    fn flatten_falls_back_on_mixed_fields() {
        let fields = vec![
            ("a".to_string(), scalar_cell(1.0)),
            (
                "b".to_string(),
                Value::Logical(LogicalArray {
                    shape: vec![1],
                    data: vec![true],
                }),
            ),
        ];
        let s = flatten_struct(fields);
        assert!(!s.is_array);
        // fallback keeps the walked values untouched
        assert!(matches!(s.get("a"), Some(Value::Cell(_))));
        assert!(matches!(s.get("b"), Some(Value::Logical(_))));
    }

    #[test]
    fn flatten_falls_back_on_shape_mismatch() {
        let one = scalar_cell(1.0);
        let two = Value::Cell(CellArray {
            shape: vec![1, 2],
            elements: vec![scalar_cell(1.0), scalar_cell(2.0)],
        });
        let s = flatten_struct(vec![("a".to_string(), one), ("b".to_string(), two)]);
        assert!(!s.is_array);
        assert!(matches!(s.get("b"), Some(Value::Cell(c)) if c.elements.len() == 2));
    }
}
