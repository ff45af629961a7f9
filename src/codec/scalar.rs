//! Booleans, numbers and the absent value (spec.md Sec.3): each an empty
//! group carrying its `"type"` attribute plus a value attribute
//! (`bool_value`/`number_value`), not a dataset — matching
//! `examples/original_source/h5it/base.py`'s `save_bool`/`save_number`/
//! `save_none`, which all call `parent.create_group(name)`.

use crate::container::{AttrValue, Hdf5Container, NodeHandle};
use crate::error::{DeserializationError, SerializationError};
use crate::value::Number;

const NUMBER_KIND_INT: &str = "int";
const NUMBER_KIND_FLOAT: &str = "float";
const NUMBER_KIND_COMPLEX: &str = "complex";

pub fn write_bool(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
    value: bool,
) -> Result<NodeHandle, SerializationError> {
    let handle = container
        .create_group(parent, name)
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    set_type(container, &handle, name, "bool")?;
    container
        .set_attr(&handle, "bool_value", &AttrValue::Bool(value))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    Ok(handle)
}

pub fn read_bool(
    container: &Hdf5Container,
    handle: &NodeHandle,
) -> Result<bool, DeserializationError> {
    container
        .get_attr_bool(handle, "bool_value")
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })
        .map(|v| v.unwrap_or(false))
}

pub fn write_number(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
    value: &Number,
) -> Result<NodeHandle, SerializationError> {
    let handle = container
        .create_group(parent, name)
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    set_type(container, &handle, name, "Number")?;

    let kind = match value {
        Number::Int(_) => NUMBER_KIND_INT,
        Number::Float(_) => NUMBER_KIND_FLOAT,
        Number::Complex(_) => NUMBER_KIND_COMPLEX,
    };
    container
        .set_attr(&handle, "number_kind", &AttrValue::Str(kind.to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;

    let value_attr = match value {
        Number::Int(i) => AttrValue::Int(*i),
        Number::Float(f) => AttrValue::Float(*f),
        Number::Complex(c) => AttrValue::FloatPair(c.re, c.im),
    };
    container
        .set_attr(&handle, "number_value", &value_attr)
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;

    Ok(handle)
}

pub fn read_number(
    container: &Hdf5Container,
    handle: &NodeHandle,
) -> Result<Number, DeserializationError> {
    let kind = container
        .get_attr_string(handle, "number_kind")
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })?
        .unwrap_or_else(|| NUMBER_KIND_FLOAT.to_string());

    match kind.as_str() {
        NUMBER_KIND_INT => {
            let i = container
                .get_attr_int(handle, "number_value")
                .map_err(|source| DeserializationError::Container {
                    node_path: handle.path(),
                    source,
                })?
                .unwrap_or_default();
            Ok(Number::Int(i))
        }
        NUMBER_KIND_COMPLEX => {
            let (re, im) = container
                .get_attr_float_pair(handle, "number_value")
                .map_err(|source| DeserializationError::Container {
                    node_path: handle.path(),
                    source,
                })?
                .unwrap_or_default();
            Ok(Number::Complex(num_complex::Complex64::new(re, im)))
        }
        _ => {
            let f = container
                .get_attr_float(handle, "number_value")
                .map_err(|source| DeserializationError::Container {
                    node_path: handle.path(),
                    source,
                })?
                .unwrap_or_default();
            Ok(Number::Float(f))
        }
    }
}

fn set_type(
    container: &Hdf5Container,
    handle: &NodeHandle,
    name: &str,
    tag: &str,
) -> Result<(), SerializationError> {
    container
        .set_attr(handle, "type", &AttrValue::Str(tag.to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })
}

pub fn write_absent(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
) -> Result<NodeHandle, SerializationError> {
    let handle = container
        .create_group(parent, name)
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    set_type(container, &handle, name, "NoneType")?;
    Ok(handle)
}
