//! Numeric arrays (spec.md Sec.3), backed by `ndarray` in memory and a
//! compressed, checksummed dataset on disk.

use ndarray::IxDyn;

use crate::container::{AttrValue, Hdf5Container, NodeHandle, RawArray};
use crate::error::{DeserializationError, SerializationError};
use crate::value::{ArrayData, ArrayDtype, ArrayValue};

fn dtype_name(dtype: ArrayDtype) -> &'static str {
    match dtype {
        ArrayDtype::F32 => "f32",
        ArrayDtype::F64 => "f64",
        ArrayDtype::I32 => "i32",
        ArrayDtype::I64 => "i64",
        ArrayDtype::U8 => "u8",
    }
}

fn dtype_from_name(name: &str) -> Option<ArrayDtype> {
    match name {
        "f32" => Some(ArrayDtype::F32),
        "f64" => Some(ArrayDtype::F64),
        "i32" => Some(ArrayDtype::I32),
        "i64" => Some(ArrayDtype::I64),
        "u8" => Some(ArrayDtype::U8),
        _ => None,
    }
}

/// Confirms `shape`'s product matches the flat data length by actually
/// building an `ndarray::ArrayD` from it; this is the shape check
/// `ndarray::Array::from_shape_vec` already performs, so we reuse it
/// instead of reimplementing the arithmetic.
fn validate_shape(shape: &[usize], data: &ArrayData) -> Result<(), String> {
    match data {
        ArrayData::F32(v) => ndarray::ArrayD::from_shape_vec(IxDyn(shape), v.clone())
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ArrayData::F64(v) => ndarray::ArrayD::from_shape_vec(IxDyn(shape), v.clone())
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ArrayData::I32(v) => ndarray::ArrayD::from_shape_vec(IxDyn(shape), v.clone())
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ArrayData::I64(v) => ndarray::ArrayD::from_shape_vec(IxDyn(shape), v.clone())
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ArrayData::U8(v) => ndarray::ArrayD::from_shape_vec(IxDyn(shape), v.clone())
            .map(|_| ())
            .map_err(|e| e.to_string()),
    }
}

pub fn write_array(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
    value: &ArrayValue,
) -> Result<NodeHandle, SerializationError> {
    validate_shape(&value.shape, &value.data).map_err(|reason| SerializationError::General(
        format!("array at '{name}' has a shape mismatch: {reason}"),
    ))?;

    let raw = RawArray {
        shape: value.shape.clone(),
        dtype: value.dtype,
        data: value.data.clone(),
    };
    let handle =
        container
            .write_array(parent, name, &raw)
            .map_err(|source| SerializationError::Container {
                node_path: name.to_string(),
                source,
            })?;
    container
        .set_attr(&handle, "type", &AttrValue::Str("ndarray".to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    container
        .set_attr(&handle, "dtype", &AttrValue::Str(dtype_name(value.dtype).to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    Ok(handle)
}

pub fn read_array(
    container: &Hdf5Container,
    handle: &NodeHandle,
) -> Result<ArrayValue, DeserializationError> {
    let dtype_attr = container
        .get_attr_string(handle, "dtype")
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })?
        .ok_or_else(|| DeserializationError::General(format!(
            "ndarray node '{}' is missing its dtype attribute",
            handle.path()
        )))?;
    let dtype = dtype_from_name(&dtype_attr).ok_or_else(|| DeserializationError::General(
        format!("ndarray node '{}' has unrecognized dtype '{dtype_attr}'", handle.path()),
    ))?;

    let raw = container
        .read_array(handle, dtype)
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })?;

    validate_shape(&raw.shape, &raw.data).map_err(|reason| {
        DeserializationError::General(format!(
            "array at '{}' has a shape mismatch: {reason}",
            handle.path()
        ))
    })?;

    Ok(ArrayValue {
        shape: raw.shape,
        dtype: raw.dtype,
        data: raw.data,
    })
}
