//! Decoded value model: the v7-semantics value tree.

use rustymat_container::RawData;

use crate::class::MatClass;

/// Typed element storage for a numeric array.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl NumericData {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            NumericData::I8(v) => v.len(),
            NumericData::I16(v) => v.len(),
            NumericData::I32(v) => v.len(),
            NumericData::I64(v) => v.len(),
            NumericData::U8(v) => v.len(),
            NumericData::U16(v) => v.len(),
            NumericData::U32(v) => v.len(),
            NumericData::U64(v) => v.len(),
            NumericData::F32(v) => v.len(),
            NumericData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All elements widened to `f64`.  Convenient for tests and callers that
    /// do not care about the storage class.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            NumericData::I8(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::I16(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::I32(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::I64(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::U8(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::U16(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::U32(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::U64(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::F32(v) => v.iter().map(|&x| x as f64).collect(),
            NumericData::F64(v) => v.clone(),
        }
    }
}

/// A numeric array with its declared class and shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    pub class: MatClass,
    pub shape: Vec<u64>,
    pub data: NumericData,
}

/// A complex array reconstructed from paired real/imag components.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexArray {
    pub class: MatClass,
    pub shape: Vec<u64>,
    pub real: NumericData,
    pub imag: NumericData,
}

/// A character array, kept as UTF-16 code units with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CharArray {
    pub shape: Vec<u64>,
    pub units: Vec<u16>,
}

impl CharArray {
    /// Decode the code units to a `String`, replacing unpaired surrogates.
    pub fn text(&self) -> String {
        char::decode_utf16(self.units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

/// A logical (boolean) array.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalArray {
    pub shape: Vec<u64>,
    pub data: Vec<bool>,
}

/// A cell array: an ordered sequence of values with a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    pub shape: Vec<u64>,
    pub elements: Vec<Value>,
}

/// A struct (or struct array): ordered field-name → value mapping.
///
/// `is_array` is set when the fields encode per-element sequences of a
/// struct array rather than a scalar struct's direct values.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub fields: Vec<(String, Value)>,
    pub is_array: bool,
}

impl StructValue {
    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Ordered field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

/// A decoded variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Numeric(NumericArray),
    Complex(ComplexArray),
    Char(CharArray),
    Logical(LogicalArray),
    Cell(CellArray),
    Struct(StructValue),
    /// Unrecognized class: the raw payload, passed through untransformed.
    Raw(RawData),
}

impl Value {
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            Value::Numeric(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexArray> {
        match self {
            Value::Complex(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            Value::Char(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_logical(&self) -> Option<&LogicalArray> {
        match self {
            Value::Logical(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            Value::Cell(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// The value's shape, where it has one.
    pub fn shape(&self) -> Option<&[u64]> {
        match self {
            Value::Numeric(a) => Some(&a.shape),
            Value::Complex(a) => Some(&a.shape),
            Value::Char(a) => Some(&a.shape),
            Value::Logical(a) => Some(&a.shape),
            Value::Cell(a) => Some(&a.shape),
            Value::Struct(_) | Value::Raw(_) => None,
        }
    }
}

/// Insertion-ordered variable-name → [`Value`] mapping.
///
/// Iteration yields entries in the order they were requested (or, for a
/// whole-file read, catalog order).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VarMap {
    entries: Vec<(String, Value)>,
}

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: Value) {
        self.entries.push((name, value));
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for VarMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
