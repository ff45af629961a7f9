//! The reconstruction protocol for user-defined instances (spec.md
//! Sec.4.4). `Instance` is the trait a Rust type implements to become
//! reducible/rebuildable; it is the generic escape hatch the closed
//! [`crate::value::Value`] enum delegates to for anything that isn't one
//! of the built-in kinds — the Rust analogue of the source's arbitrary
//! Python object.

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;

use crate::error::{DeserializationError, SerializationError};
use crate::value::Value;

/// Which constructor shape a reduction uses, mirroring
/// `original_source/h5it/stdpickle.py`'s `NEWOBJ` vs. `REDUCE` split.
#[derive(Debug, Clone)]
pub enum ReduceHook {
    /// `cls.__new__(cls, *args)` — the common case for plain instances.
    NewObj {
        class: (String, String),
        args: Vec<Value>,
    },
    /// `func(*args)` — reduction through an arbitrary callable.
    Reduce {
        func: (String, String),
        args: Vec<Value>,
    },
    /// A bare global symbol (the value itself doesn't decompose).
    Global { module: String, name: String },
    /// `__newobj_ex__`-style keyword-argument construction. Always
    /// rejected (spec.md Sec.4.4 "Specializations").
    NewObjEx {
        class: (String, String),
    },
    /// A legacy pickle extension code. Always rejected.
    ExtensionCode(i32),
}

/// The full output of reducing one instance: the constructor shape plus
/// the optional state/listitems/dictitems triad.
#[derive(Debug, Clone)]
pub struct ReduceOutput {
    pub hook: ReduceHook,
    pub state: Option<Value>,
    pub listitems: Option<Vec<Value>>,
    pub dictitems: Option<Vec<(Value, Value)>>,
}

impl ReduceOutput {
    pub fn new(hook: ReduceHook) -> Self {
        Self {
            hook,
            state: None,
            listitems: None,
            dictitems: None,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_listitems(mut self, items: Vec<Value>) -> Self {
        self.listitems = Some(items);
        self
    }

    pub fn with_dictitems(mut self, items: Vec<(Value, Value)>) -> Self {
        self.dictitems = Some(items);
        self
    }
}

/// Implemented by any Rust type that wants to round-trip through the
/// reduction subsystem. Mirrors the Python `__reduce_ex__`/`__reduce__`/
/// `__getstate__`/`__setstate__` quartet, collapsed to the degree Rust's
/// static typing allows (see DESIGN.md for the precedence-chain mapping).
pub trait Instance: fmt::Debug {
    /// Precedence step 2 (spec.md Sec.4.4): treat this value as a global
    /// symbol rather than decomposing it. Returning `Some` short-circuits
    /// `reduce`.
    fn class_like(&self) -> Option<(String, String)> {
        None
    }

    /// Precedence steps 3/4 collapsed into one hook.
    fn reduce(&self) -> Result<ReduceOutput, SerializationError>;

    /// Apply `state` to a freshly allocated shell. The default rejects —
    /// override to support the record's `state` field.
    fn set_state(&mut self, state: Value) -> Result<(), DeserializationError> {
        let _ = state;
        Err(DeserializationError::General(format!(
            "{self:?} does not implement set_state"
        )))
    }

    fn append_item(&mut self, item: Value) -> Result<(), DeserializationError> {
        let _ = item;
        Err(DeserializationError::General(format!(
            "{self:?} does not support listitems"
        )))
    }

    fn assign_item(&mut self, key: Value, value: Value) -> Result<(), DeserializationError> {
        let _ = (key, value);
        Err(DeserializationError::General(format!(
            "{self:?} does not support dictitems"
        )))
    }

    /// Structural equality, used by the round-trip tests (spec.md Sec.8
    /// says equality holds "under the class's equality").
    fn eq_instance(&self, other: &dyn Instance) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// A generic, field-bag instance: the default target for reconstruction
/// when a concrete Rust type hasn't registered a [`crate::reduction::symbol::ClassSymbol`]
/// of its own. Stores its class identity and a textual-keyed field map,
/// applying spec.md Sec.4.4's default state rule directly (install a
/// plain mapping's entries by attribute name).
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicInstance {
    pub module: String,
    pub class_name: String,
    pub fields: IndexMap<String, Value>,
    pub list_items: Vec<Value>,
    pub dict_items: Vec<(Value, Value)>,
}

impl DynamicInstance {
    pub fn new(module: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            class_name: class_name.into(),
            fields: IndexMap::new(),
            list_items: Vec::new(),
            dict_items: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

impl Instance for DynamicInstance {
    fn reduce(&self) -> Result<ReduceOutput, SerializationError> {
        let state = Value::DictStr(std::rc::Rc::new(self.fields.clone()));
        Ok(ReduceOutput::new(ReduceHook::NewObj {
            class: (self.module.clone(), self.class_name.clone()),
            args: Vec::new(),
        })
        .with_state(state))
    }

    fn set_state(&mut self, state: Value) -> Result<(), DeserializationError> {
        match state {
            Value::DictStr(map) => {
                for (k, v) in map.iter() {
                    self.fields.insert(k.clone(), v.clone());
                }
                Ok(())
            }
            Value::Tuple(tuple) if tuple.len() == 2 => {
                // (dict_state, slot_state) split (spec.md Sec.4.4).
                for part in tuple.iter() {
                    if let Value::DictStr(map) = part {
                        for (k, v) in map.iter() {
                            self.fields.insert(k.clone(), v.clone());
                        }
                    }
                }
                Ok(())
            }
            other => Err(DeserializationError::General(format!(
                "DynamicInstance cannot apply state of kind {}",
                other.kind_name()
            ))),
        }
    }

    fn append_item(&mut self, item: Value) -> Result<(), DeserializationError> {
        self.list_items.push(item);
        Ok(())
    }

    fn assign_item(&mut self, key: Value, value: Value) -> Result<(), DeserializationError> {
        self.dict_items.push((key, value));
        Ok(())
    }

    fn eq_instance(&self, other: &dyn Instance) -> bool {
        other
            .as_any()
            .downcast_ref::<DynamicInstance>()
            .is_some_and(|o| o == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn test_dynamic_instance_reduces_to_newobj_with_state() {
        let inst = DynamicInstance::new("tests", "Record").with_field("a", Value::Number(Number::Int(1)));
        let out = inst.reduce().unwrap();
        match out.hook {
            ReduceHook::NewObj { class, args } => {
                assert_eq!(class, ("tests".to_string(), "Record".to_string()));
                assert!(args.is_empty());
            }
            _ => panic!("expected NewObj"),
        }
        assert!(out.state.is_some());
    }

    #[test]
    fn test_dynamic_instance_set_state_merges_fields() {
        let mut inst = DynamicInstance::new("tests", "Record");
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Value::Number(Number::Int(7)));
        inst.set_state(Value::DictStr(std::rc::Rc::new(map))).unwrap();
        assert_eq!(inst.fields.get("a"), Some(&Value::Number(Number::Int(7))));
    }

    #[test]
    fn test_eq_instance_compares_structurally() {
        let a = DynamicInstance::new("tests", "Record").with_field("a", Value::Number(Number::Int(1)));
        let b = DynamicInstance::new("tests", "Record").with_field("a", Value::Number(Number::Int(1)));
        assert!(a.eq_instance(&b));
    }
}
