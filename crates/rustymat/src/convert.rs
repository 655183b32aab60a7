//! Raw payload conversion: little-endian element bytes to typed vectors.

use byteorder::{ByteOrder, LittleEndian};
use rustymat_container::{RawData, StorageType};

use crate::class::MatClass;
use crate::error::MatError;
use crate::value::NumericData;

/// Decode a payload's element bytes according to its storage type.
pub(crate) fn typed_elements(
    dtype: StorageType,
    bytes: &[u8],
) -> Result<NumericData, MatError> {
    let elem_size = dtype.size();
    if bytes.len() % elem_size != 0 {
        return Err(MatError::PayloadSize {
            dtype: dtype.name(),
            actual: bytes.len(),
        });
    }
    let count = bytes.len() / elem_size;
    let data = match dtype {
        StorageType::I8 => NumericData::I8(bytes.iter().map(|&b| b as i8).collect()),
        StorageType::U8 => NumericData::U8(bytes.to_vec()),
        StorageType::I16 => {
            let mut out = vec![0i16; count];
            LittleEndian::read_i16_into(bytes, &mut out);
            NumericData::I16(out)
        }
        StorageType::U16 => {
            let mut out = vec![0u16; count];
            LittleEndian::read_u16_into(bytes, &mut out);
            NumericData::U16(out)
        }
        StorageType::I32 => {
            let mut out = vec![0i32; count];
            LittleEndian::read_i32_into(bytes, &mut out);
            NumericData::I32(out)
        }
        StorageType::U32 => {
            let mut out = vec![0u32; count];
            LittleEndian::read_u32_into(bytes, &mut out);
            NumericData::U32(out)
        }
        StorageType::I64 => {
            let mut out = vec![0i64; count];
            LittleEndian::read_i64_into(bytes, &mut out);
            NumericData::I64(out)
        }
        StorageType::U64 => {
            let mut out = vec![0u64; count];
            LittleEndian::read_u64_into(bytes, &mut out);
            NumericData::U64(out)
        }
        StorageType::F32 => {
            let mut out = vec![0f32; count];
            LittleEndian::read_f32_into(bytes, &mut out);
            NumericData::F32(out)
        }
        StorageType::F64 => {
            let mut out = vec![0f64; count];
            LittleEndian::read_f64_into(bytes, &mut out);
            NumericData::F64(out)
        }
    };
    Ok(data)
}

/// The element type a class's decoded values use.
pub(crate) fn target_storage(class: &MatClass) -> Option<StorageType> {
    match class {
        MatClass::Int8 => Some(StorageType::I8),
        MatClass::Int16 => Some(StorageType::I16),
        MatClass::Int32 => Some(StorageType::I32),
        MatClass::Int64 => Some(StorageType::I64),
        MatClass::UInt8 => Some(StorageType::U8),
        MatClass::UInt16 => Some(StorageType::U16),
        MatClass::UInt32 => Some(StorageType::U32),
        MatClass::UInt64 => Some(StorageType::U64),
        MatClass::Double => Some(StorageType::F64),
        MatClass::Single => Some(StorageType::F32),
        MatClass::Char => Some(StorageType::U16),
        MatClass::Logical => Some(StorageType::U8),
        _ => None,
    }
}

fn storage_of(data: &NumericData) -> StorageType {
    match data {
        NumericData::I8(_) => StorageType::I8,
        NumericData::I16(_) => StorageType::I16,
        NumericData::I32(_) => StorageType::I32,
        NumericData::I64(_) => StorageType::I64,
        NumericData::U8(_) => StorageType::U8,
        NumericData::U16(_) => StorageType::U16,
        NumericData::U32(_) => StorageType::U32,
        NumericData::U64(_) => StorageType::U64,
        NumericData::F32(_) => StorageType::F32,
        NumericData::F64(_) => StorageType::F64,
    }
}

/// Cast decoded elements to a target element type.
///
/// A no-op when storage already matches; otherwise widens through `f64`,
/// which covers the storage/class mismatches v7.3 producers actually emit
/// (char codes stored as small unsigned ints, logicals stored as `u8`,
/// dimension vectors stored as `u64`).
pub(crate) fn cast_to(data: NumericData, target: StorageType) -> NumericData {
    if storage_of(&data) == target {
        return data;
    }
    let wide = data.to_f64_vec();
    match target {
        StorageType::I8 => NumericData::I8(wide.iter().map(|&x| x as i8).collect()),
        StorageType::I16 => NumericData::I16(wide.iter().map(|&x| x as i16).collect()),
        StorageType::I32 => NumericData::I32(wide.iter().map(|&x| x as i32).collect()),
        StorageType::I64 => NumericData::I64(wide.iter().map(|&x| x as i64).collect()),
        StorageType::U8 => NumericData::U8(wide.iter().map(|&x| x as u8).collect()),
        StorageType::U16 => NumericData::U16(wide.iter().map(|&x| x as u16).collect()),
        StorageType::U32 => NumericData::U32(wide.iter().map(|&x| x as u32).collect()),
        StorageType::U64 => NumericData::U64(wide.iter().map(|&x| x as u64).collect()),
        StorageType::F32 => NumericData::F32(wide.iter().map(|&x| x as f32).collect()),
        StorageType::F64 => NumericData::F64(wide),
    }
}

/// Decode a numeric payload into the element type of `class`.
pub(crate) fn decode_numeric(
    class: &MatClass,
    dtype: StorageType,
    bytes: &[u8],
) -> Result<NumericData, MatError> {
    let data = typed_elements(dtype, bytes)?;
    match target_storage(class) {
        Some(target) => Ok(cast_to(data, target)),
        None => Ok(data),
    }
}

/// A zero-length array of the class's element type.
pub(crate) fn zero_filled(class: &MatClass, count: usize) -> NumericData {
    let target = target_storage(class).unwrap_or(StorageType::F64);
    match target {
        StorageType::I8 => NumericData::I8(vec![0; count]),
        StorageType::I16 => NumericData::I16(vec![0; count]),
        StorageType::I32 => NumericData::I32(vec![0; count]),
        StorageType::I64 => NumericData::I64(vec![0; count]),
        StorageType::U8 => NumericData::U8(vec![0; count]),
        StorageType::U16 => NumericData::U16(vec![0; count]),
        StorageType::U32 => NumericData::U32(vec![0; count]),
        StorageType::U64 => NumericData::U64(vec![0; count]),
        StorageType::F32 => NumericData::F32(vec![0.0; count]),
        StorageType::F64 => NumericData::F64(vec![0.0; count]),
    }
}

/// Read an empty-marked payload as a dimension vector.
pub(crate) fn dims_from_payload(raw: &RawData) -> Result<Vec<u64>, MatError> {
    let (dtype, bytes) = match raw {
        RawData::Numeric { dtype, bytes, .. } => (*dtype, bytes.as_slice()),
        _ => return Err(MatError::BadDimsPayload),
    };
    let data = typed_elements(dtype, bytes)?;
    data.to_f64_vec()
        .into_iter()
        .map(|x| {
            if x >= 0.0 && x.fract() == 0.0 {
                Ok(x as u64)
            } else {
                Err(MatError::BadDimsPayload)
            }
        })
        .collect()
}

/// Elementwise non-zero coercion for logical payloads.
pub(crate) fn to_bools(data: &NumericData) -> Vec<bool> {
    data.to_f64_vec().into_iter().map(|x| x != 0.0).collect()
}

/// Character-code units for char payloads.
pub(crate) fn to_u16_units(data: NumericData) -> Vec<u16> {
    match cast_to(data, StorageType::U16) {
        NumericData::U16(v) => v,
        _ => unreachable!("cast_to(U16) yields U16"),
    }
}

/// Check that a payload's element count matches its declared shape.
pub(crate) fn check_shape(shape: &[u64], actual: usize) -> Result<(), MatError> {
    let expected: u64 = shape.iter().product();
    if expected != actual as u64 {
        return Err(MatError::ShapeMismatch {
            shape: shape.to_vec(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_bytes_f64(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn decode_f64_elements() {
        let bytes = le_bytes_f64(&[1.5, -2.25]);
        let data = typed_elements(StorageType::F64, &bytes).unwrap();
        assert_eq!(data, NumericData::F64(vec![1.5, -2.25]));
    }

    #[test]
    fn decode_i8_is_bit_exact() {
        let data = typed_elements(StorageType::I8, &[0xFF, 0x2A]).unwrap();
        assert_eq!(data, NumericData::I8(vec![-1, 42]));
    }

    #[test]
    fn ragged_payload_rejected() {
        let err = typed_elements(StorageType::F64, &[0u8; 12]).unwrap_err();
        assert!(matches!(err, MatError::PayloadSize { dtype: "f64", .. }));
    }

    #[test]
    fn class_directed_cast() {
        // u16 char codes arriving from u8 storage widen, not reinterpret
        let data = decode_numeric(&MatClass::Char, StorageType::U8, &[104, 105]).unwrap();
        assert_eq!(data, NumericData::U16(vec![104, 105]));
    }

    #[test]
    fn dims_vector_round_trip() {
        let raw = RawData::Numeric {
            dtype: StorageType::U64,
            shape: vec![2],
            bytes: [0u64.to_le_bytes(), 3u64.to_le_bytes()].concat(),
        };
        assert_eq!(dims_from_payload(&raw).unwrap(), vec![0, 3]);
    }

    #[test]
    fn bad_dims_rejected() {
        let raw = RawData::Numeric {
            dtype: StorageType::F64,
            shape: vec![1],
            bytes: (-1.0f64).to_le_bytes().to_vec(),
        };
        assert!(matches!(
            dims_from_payload(&raw),
            Err(MatError::BadDimsPayload)
        ));
    }

    #[test]
    fn nonzero_is_true() {
        let data = NumericData::U8(vec![0, 1, 2, 0]);
        assert_eq!(to_bools(&data), vec![false, true, true, false]);
    }

    #[test]
    fn shape_check() {
        assert!(check_shape(&[2, 3], 6).is_ok());
        assert!(matches!(
            check_shape(&[2, 3], 5),
            Err(MatError::ShapeMismatch { .. })
        ));
        assert!(check_shape(&[0, 0], 0).is_ok());
    }
}
