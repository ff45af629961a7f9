//! Error taxonomy for the object graph serializer.
//!
//! Two distinguished failure kinds, one per direction, following
//! spec.md Sec.7: saving produces [`SerializationError`], loading produces
//! [`DeserializationError`]. Both carry enough context (node path, tag,
//! offending kind) to locate the fault inside the container.

use thiserror::Error;

/// Errors raised while writing a value graph to a container.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("cannot reduce value of kind '{kind}': no registered reducer, hook, or class-like test matched")]
    CannotReduce { kind: String },

    #[error("reduction protocol unsupported at '{node_path}': {reason}")]
    ProtocolUnsupported { node_path: String, reason: String },

    #[error("legacy pickle extension codes are not supported (value at '{node_path}')")]
    ExtensionCodeUnsupported { node_path: String },

    #[error("mapping at '{node_path}' has non-textual keys and cannot be written as instance state")]
    NonTextualKeys { node_path: String },

    #[error("dict/set at '{node_path}' has a key or element of kind '{kind}', which cannot be hashed for a child name")]
    UnhashableKey { node_path: String, kind: String },

    #[error("name collision writing child '{name}' under '{parent_path}'")]
    NameCollision { parent_path: String, name: String },

    #[error("symbol resolver could not describe value at '{node_path}': {reason}")]
    SymbolNotResolvable { node_path: String, reason: String },

    #[error("container error while writing '{node_path}': {source}")]
    Container {
        node_path: String,
        #[source]
        source: crate::container::ContainerError,
    },

    #[error("I/O error writing '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    General(String),
}

/// Errors raised while reading a value graph back from a container.
#[derive(Error, Debug)]
pub enum DeserializationError {
    #[error("top-level namespace group '{namespace}' is missing from the container")]
    MissingNamespace { namespace: String },

    #[error("node '{node_path}' has no 'type' attribute")]
    MissingTypeAttribute { node_path: String },

    #[error("unknown type tag '{tag}' at '{node_path}'")]
    UnknownTag { node_path: String, tag: String },

    #[error("list node '{node_path}' is missing elements: expected contiguous 0..{expected_len}, found indices {found:?}")]
    NonContiguousList {
        node_path: String,
        expected_len: usize,
        found: Vec<usize>,
    },

    #[error("reduction node '{node_path}' has neither a class nor a function constructor attribute")]
    MissingConstructor { node_path: String },

    #[error("symbol '{module}.{name}' could not be resolved: {reason}")]
    UnresolvedSymbol {
        module: String,
        name: String,
        reason: String,
    },

    #[error("unsupported encoding '{encoding}': expected 'ASCII' or 'bytes'")]
    InvalidEncoding { encoding: String },

    #[error("container error while reading '{node_path}': {source}")]
    Container {
        node_path: String,
        #[source]
        source: crate::container::ContainerError,
    },

    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    General(String),
}

impl SerializationError {
    /// Recovery suggestions surfaced by the CLI, in the same spirit as the
    /// teacher's `IndexError::recovery_suggestions`.
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::CannotReduce { .. } => Some(
                "implement Reduce for this type, or register a per-kind reducer",
            ),
            Self::NonTextualKeys { .. } => Some(
                "only string-keyed mappings may be used as instance state; use Value::Dict for arbitrary keys",
            ),
            Self::UnhashableKey { .. } => Some(
                "lists, dicts, sets, arrays, reductions and instances cannot be used as dict/set keys",
            ),
            Self::NameCollision { .. } => Some(
                "two keys hashed to the same child name; this is vanishingly rare but fatal by design",
            ),
            _ => None,
        }
    }
}

impl DeserializationError {
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::NonContiguousList { .. } => Some(
                "the container was tampered with or truncated; a list's children must be 0..n-1",
            ),
            Self::InvalidEncoding { .. } => Some("pass Encoding::Ascii or Encoding::Bytes"),
            _ => None,
        }
    }
}
