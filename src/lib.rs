//! Object graph serialization into HDF5 containers with identity and
//! topology fidelity (spec.md Sec.1/Sec.2): [`dump`] writes a [`Value`]
//! graph into a container under the fixed top-level namespace, [`load`]
//! (and [`load_with_encoding`]) read it back.

pub mod cli;
pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod reduction;
pub mod registry;
pub mod types;
pub mod utils;
pub mod value;
pub mod walker;

pub use config::Settings;
pub use error::{DeserializationError, SerializationError};
pub use reduction::{
    ClassSymbol, FunctionSymbol, Instance, ProcessSymbolRegistry, ReduceHook, ReduceOutput,
    ReductionRecord, SymbolResolver,
};
pub use types::{Tag, ValueId};
pub use value::{ArrayDtype, ArrayValue, Number, PathFlavor, Value};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::WalkerConfig;
use crate::container::Hdf5Container;

/// The fixed top-level namespace group every container's root contains
/// (spec.md Sec.4.1/External Interfaces). Not configurable: two
/// containers written by this crate are interchangeable precisely
/// because the root value always lives at this one key.
pub const NAMESPACE: &str = "h5it";

/// How to interpret a legacy `py2_bytes` node on load (spec.md Sec.9).
/// Newly written containers never produce this tag; it only matters when
/// reading an older container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Ascii,
    Bytes,
}

/// Write `value` into a fresh HDF5 container at `path`, under the fixed
/// top-level namespace group ([`NAMESPACE`]).
///
/// The file is written to a temporary sibling path and renamed into
/// place once the walk succeeds, so a crash mid-write never leaves a
/// half-written container at `path`.
pub fn dump(path: impl AsRef<Path>, value: &Value) -> Result<(), SerializationError> {
    dump_with_settings(path, value, &WalkerConfig::default())
}

pub fn dump_with_settings(
    path: impl AsRef<Path>,
    value: &Value,
    settings: &WalkerConfig,
) -> Result<(), SerializationError> {
    let path = path.as_ref();
    let tmp_path = sibling_tmp_path(path);

    let container = Hdf5Container::create(&tmp_path).map_err(|source| SerializationError::Container {
        node_path: "/".to_string(),
        source,
    })?;
    let session = walker::ExportSession::new(&container, settings);
    session.export_root(value)?;
    drop(container);

    std::fs::rename(&tmp_path, path).map_err(|source| SerializationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log_event!("walker", "dump-complete", "{}", path.display());
    Ok(())
}

/// Read a value graph back, rejecting any legacy `py2_bytes` node (there
/// should be none in a container this crate wrote).
pub fn load(path: impl AsRef<Path>, resolver: &dyn SymbolResolver) -> Result<Value, DeserializationError> {
    load_with_encoding(path, resolver, Encoding::Bytes)
}

/// Read a value graph back, using `encoding` to interpret any legacy
/// `py2_bytes` nodes encountered.
pub fn load_with_encoding(
    path: impl AsRef<Path>,
    resolver: &dyn SymbolResolver,
    encoding: Encoding,
) -> Result<Value, DeserializationError> {
    let path = path.as_ref();
    let container = Hdf5Container::open(path).map_err(|source| DeserializationError::Container {
        node_path: "/".to_string(),
        source,
    })?;
    let session = walker::ImportSession::new(&container, resolver, encoding);
    let value = session.import_root()?;
    log_event!("walker", "load-complete", "{}", path.display());
    Ok(value)
}

fn sibling_tmp_path(path: &Path) -> std::path::PathBuf {
    let file_name = path
        .file_name()
        .map(|n| format!(".{}.tmp", n.to_string_lossy()))
        .unwrap_or_else(|| ".h5graph.tmp".to_string());
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => std::path::PathBuf::from(file_name),
    }
}

/// Expands a leading `~` in a path using the user's home directory,
/// falling back to the input unchanged when it can't be resolved.
pub fn normalize_path(path: &str) -> std::path::PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    std::path::PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_tmp_path_keeps_parent_directory() {
        let tmp = sibling_tmp_path(Path::new("/tmp/graphs/out.h5"));
        assert_eq!(tmp, std::path::PathBuf::from("/tmp/graphs/.out.h5.tmp"));
    }

    #[test]
    fn test_normalize_path_expands_tilde() {
        if let Some(home) = dirs::home_dir() {
            let normalized = normalize_path("~/graphs/out.h5");
            assert_eq!(normalized, home.join("graphs/out.h5"));
        }
    }

    #[test]
    fn test_normalize_path_leaves_absolute_path_untouched() {
        let normalized = normalize_path("/tmp/out.h5");
        assert_eq!(normalized, std::path::PathBuf::from("/tmp/out.h5"));
    }
}
