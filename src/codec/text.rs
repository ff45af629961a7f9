//! Unicode text (spec.md Sec.3), stored as a variable-length string
//! dataset.

use crate::container::{AttrValue, Hdf5Container, NodeHandle};
use crate::error::{DeserializationError, SerializationError};

pub fn write_text(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
    value: &str,
) -> Result<NodeHandle, SerializationError> {
    let handle = container
        .write_bytes(parent, name, value.as_bytes())
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    container
        .set_attr(&handle, "type", &AttrValue::Str("str".to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    Ok(handle)
}

pub fn read_text(
    container: &Hdf5Container,
    handle: &NodeHandle,
) -> Result<String, DeserializationError> {
    let bytes = container
        .read_bytes(handle)
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })?;
    String::from_utf8(bytes).map_err(|e| DeserializationError::General(format!(
        "text node '{}' is not valid UTF-8: {e}",
        handle.path()
    )))
}
