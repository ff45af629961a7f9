//! Raw byte strings, including the legacy `py2_bytes` tag (spec.md
//! Sec.9 resolution: new containers always write `"bytes"`; both tags
//! are readable).

use crate::container::{AttrValue, Hdf5Container, NodeHandle};
use crate::error::{DeserializationError, SerializationError};

pub fn write_bytes(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
    value: &[u8],
) -> Result<NodeHandle, SerializationError> {
    let handle = container
        .write_bytes(parent, name, value)
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    container
        .set_attr(&handle, "type", &AttrValue::Str("bytes".to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    Ok(handle)
}

pub fn read_bytes(
    container: &Hdf5Container,
    handle: &NodeHandle,
) -> Result<Vec<u8>, DeserializationError> {
    container
        .read_bytes(handle)
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })
}
