//! The physical HDF5 layer (spec.md Sec.4.1): groups (an ordered-by-name
//! mapping to children, plus string-keyed scalar attributes) and datasets
//! (a typed array payload, plus the same attribute facility), connected
//! by ordinary hard links and by soft links used for aliasing shared or
//! cyclic subgraphs.
//!
//! Everything above this module (registry, codec, walker) talks to the
//! container only through [`Hdf5Container`] and [`NodeHandle`] — never
//! to the `hdf5` crate directly — so the physical backend stays a single
//! swappable seam.

mod hdf5_backend;

pub use hdf5_backend::Hdf5Container;

use std::path::PathBuf;
use thiserror::Error;

use crate::value::{ArrayDtype, ArrayData};

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("failed to open container '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: hdf5::Error,
    },

    #[error("failed to create container '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: hdf5::Error,
    },

    #[error("node '{path}' not found")]
    NotFound { path: String },

    #[error("node '{path}' is a {actual}, expected a {expected}")]
    WrongKind {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("attribute '{name}' on '{path}' has an unsupported or mismatched type")]
    AttributeType { path: String, name: String },

    #[error("underlying HDF5 operation failed at '{path}': {source}")]
    Hdf5 {
        path: String,
        #[source]
        source: hdf5::Error,
    },
}

/// What kind of object a [`NodeHandle`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset,
}

/// A single string-or-scalar attribute value, matching spec.md Sec.4.1's
/// "groups and datasets both carry string-keyed scalar attributes".
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A 2-component float attribute, used for `number_value` on a complex
    /// number (spec.md Sec.3: "complex as two-component").
    FloatPair(f64, f64),
}

/// A reference to either an HDF5 group or dataset, opaque to everything
/// outside this module.
#[derive(Debug, Clone)]
pub enum NodeHandle {
    Group(hdf5::Group),
    Dataset(hdf5::Dataset),
}

impl NodeHandle {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeHandle::Group(_) => NodeKind::Group,
            NodeHandle::Dataset(_) => NodeKind::Dataset,
        }
    }

    pub fn path(&self) -> String {
        match self {
            NodeHandle::Group(g) => g.name(),
            NodeHandle::Dataset(d) => d.name(),
        }
    }
}

/// A raw, type-erased array payload as read from or written to a
/// dataset. [`crate::codec::array`] is responsible for converting this
/// to and from [`crate::value::ArrayValue`].
#[derive(Debug, Clone)]
pub struct RawArray {
    pub shape: Vec<usize>,
    pub dtype: ArrayDtype,
    pub data: ArrayData,
}
