//! Filesystem paths (spec.md Sec.3/Sec.9): written with a flavor tag
//! (`path_posix`/`path_windows`) so a loader on a foreign OS can still
//! recover the original text even though it can't construct a concrete,
//! host-native path for it.

use crate::container::{AttrValue, Hdf5Container, NodeHandle};
use crate::error::{DeserializationError, SerializationError};
use crate::registry::TypeRegistry;
use crate::value::PathFlavor;

pub fn write_path(
    container: &Hdf5Container,
    parent: &NodeHandle,
    name: &str,
    flavor: PathFlavor,
    text: &str,
) -> Result<NodeHandle, SerializationError> {
    let handle = container
        .write_bytes(parent, name, text.as_bytes())
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    let tag = TypeRegistry::global().tag_for_path_flavor(flavor);
    container
        .set_attr(&handle, "type", &AttrValue::Str(tag.0.to_string()))
        .map_err(|source| SerializationError::Container {
            node_path: name.to_string(),
            source,
        })?;
    Ok(handle)
}

pub fn read_path(
    container: &Hdf5Container,
    handle: &NodeHandle,
    flavor: PathFlavor,
) -> Result<String, DeserializationError> {
    let bytes = container
        .read_bytes(handle)
        .map_err(|source| DeserializationError::Container {
            node_path: handle.path(),
            source,
        })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        DeserializationError::General(format!("path node '{}' is not valid UTF-8: {e}", handle.path()))
    })?;
    let _ = flavor; // flavor only disambiguates the tag; the text is flavor-agnostic.
    Ok(text)
}

/// Whether `flavor` matches the host this process is running on. A
/// caller that wants a concrete, usable `std::path::Path` should check
/// this first — a path tagged for the other OS family can only be
/// treated as opaque text (spec.md Sec.9's "pure" path case).
pub fn flavor_matches_host(flavor: PathFlavor) -> bool {
    match flavor {
        PathFlavor::Posix => cfg!(unix),
        PathFlavor::Windows => cfg!(windows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_matches_host_is_exclusive() {
        assert_ne!(
            flavor_matches_host(PathFlavor::Posix),
            flavor_matches_host(PathFlavor::Windows)
        );
    }
}
