//! The closed sum type the graph walker dispatches over.
//!
//! spec.md Sec.9 ("Extensibility") asks for exactly this: replace the
//! dynamic type-to-exporter table the original Python implementation used
//! with a closed `enum` and match-based dispatch. `Value` is the typed,
//! in-memory shape every exporter/importer in [`crate::codec`] and
//! [`crate::reduction`] reads and writes.

use indexmap::IndexMap;
use num_complex::Complex64;
use std::cell::RefCell;
use std::rc::Rc;

use crate::reduction::{Instance, ReductionRecord};

/// A numeric scalar, matching spec.md Sec.3's int/float/complex trio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    Complex(Complex64),
}

/// A multidimensional numeric array: shape, dtype tag and row-major data.
/// The actual element storage is kept generic-free (`ArrayData`) so `Value`
/// itself stays a plain, cloneable enum; [`crate::codec::array`] is the only
/// place that talks to `ndarray` directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub shape: Vec<usize>,
    pub dtype: ArrayDtype,
    pub data: ArrayData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayDtype {
    F32,
    F64,
    I32,
    I64,
    U8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
}

/// Which filesystem path flavor a `Value::Path` was tagged with on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFlavor {
    Posix,
    Windows,
}

/// The value model recognized by the core (spec.md Sec.3's table).
///
/// Graph sharing and cycles are expressed through `Rc`: two positions in a
/// `Value` tree that point at the same `Rc` are the same in-memory object,
/// exactly the identity the walker's memo is responsible for preserving.
#[derive(Debug, Clone)]
pub enum Value {
    Absent,
    Bool(bool),
    Number(Number),
    Text(Rc<str>),
    Bytes(Rc<[u8]>),
    /// Legacy `py2_bytes` tag: only ever produced by loading an old
    /// container; never written by this crate (spec.md Sec.9 resolution).
    LegacyBytes(Rc<[u8]>),
    List(Rc<Vec<Value>>),
    Tuple(Rc<Vec<Value>>),
    /// Textual-keyed mapping: the variant used for instance state and for
    /// any mapping whose keys are all strings.
    DictStr(Rc<IndexMap<String, Value>>),
    /// Arbitrary-keyed mapping: order is not significant, children are
    /// named by a hash of the key (spec.md Sec.4.2).
    Dict(Rc<Vec<(Value, Value)>>),
    Set(Rc<Vec<Value>>),
    Array(Rc<ArrayValue>),
    Path(PathFlavor, Rc<str>),
    Global { module: Rc<str>, name: Rc<str> },
    Reduction(Rc<ReductionRecord>),
    /// A live, already-rebuilt instance (only produced by `load`; never
    /// an input to `dump` directly — callers hand `dump` an `Instance`
    /// through the walker, not a bare `Value::Instance`).
    Instance(Rc<RefCell<dyn Instance>>),
}

impl Value {
    /// A short, stable label for error messages and the `CannotReduce`
    /// family of errors. Not the on-disk tag — see [`crate::registry`] for
    /// that.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Absent => "Absent",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bytes(_) => "Bytes",
            Value::LegacyBytes(_) => "LegacyBytes",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::DictStr(_) => "DictStr",
            Value::Dict(_) => "Dict",
            Value::Set(_) => "Set",
            Value::Array(_) => "Array",
            Value::Path(..) => "Path",
            Value::Global { .. } => "Global",
            Value::Reduction(_) => "Reduction",
            Value::Instance(_) => "Instance",
        }
    }

    pub fn text(s: impl Into<Rc<str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn bytes(b: impl Into<Rc<[u8]>>) -> Self {
        Value::Bytes(b.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::new(items))
    }
}

/// Natural per-kind equality for the round-trip law in spec.md Sec.8:
/// `load(dump(v)) == v`. `Rc` identity is irrelevant here — this compares
/// structure, not address; identity is checked separately by the caller
/// via `Rc::ptr_eq` where the test cares about aliasing.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Absent, Absent) => true,
            (Bool(a), Bool(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (LegacyBytes(a), LegacyBytes(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            (DictStr(a), DictStr(b)) => a == b,
            (Dict(a), Dict(b)) => a == b,
            (Set(a), Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x))
            }
            (Array(a), Array(b)) => a == b,
            (Path(fa, a), Path(fb, b)) => fa == fb && a == b,
            (Global { module: ma, name: na }, Global { module: mb, name: nb }) => {
                ma == mb && na == nb
            }
            (Reduction(a), Reduction(b)) => a == b,
            (Instance(a), Instance(b)) => a.borrow().eq_instance(&*b.borrow()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_stable() {
        assert_eq!(Value::Absent.kind_name(), "Absent");
        assert_eq!(Value::text("x").kind_name(), "Text");
    }

    #[test]
    fn test_equality_ignores_rc_identity() {
        let a = Value::list(vec![Value::Number(Number::Int(1))]);
        let b = Value::list(vec![Value::Number(Number::Int(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_equality_is_order_independent() {
        let a = Value::Set(Rc::new(vec![Value::Number(Number::Int(1)), Value::Number(Number::Int(2))]));
        let b = Value::Set(Rc::new(vec![Value::Number(Number::Int(2)), Value::Number(Number::Int(1))]));
        assert_eq!(a, b);
    }
}
