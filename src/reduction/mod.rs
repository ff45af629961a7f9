//! The reduction/rebuild protocol (spec.md Sec.4.4): turns an arbitrary
//! [`Instance`] into a [`Value::Reduction`] on save, and a
//! [`ReductionRecord`] back into a live instance on load.
//!
//! The source implementation picks a save strategy through a five-step
//! precedence chain (per-kind dispatch table, class-like/metaclass test,
//! `__reduce_ex__`, `__reduce__`, failure). Rust has no runtime class
//! introspection, so this collapses to two steps: [`Instance::class_like`]
//! short-circuits to a bare [`Value::Global`], otherwise
//! [`Instance::reduce`] supplies the constructor/state triad directly.

pub mod instance;
pub mod interner;
pub mod record;
pub mod symbol;

pub use instance::{Instance, ReduceHook, ReduceOutput};
pub use record::{Constructor, ReductionRecord};
pub use symbol::{ClassSymbol, FunctionSymbol, ResolveError, Symbol, SymbolResolver};

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{DeserializationError, SerializationError};
use crate::value::Value;

/// Reduce one instance to its `Value` representation, implementing the
/// collapsed precedence chain described above.
pub fn reduce_instance(instance: &dyn Instance) -> Result<Value, SerializationError> {
    if let Some((module, name)) = instance.class_like() {
        return Ok(Value::Global {
            module: module.into(),
            name: name.into(),
        });
    }

    let output = instance.reduce()?;

    let constructor = match output.hook {
        ReduceHook::NewObj { class, args } => Constructor::Class {
            module: class.0.into(),
            name: class.1.into(),
            args,
        },
        ReduceHook::Reduce { func, args } => Constructor::Function {
            module: func.0.into(),
            name: func.1.into(),
            args,
        },
        ReduceHook::Global { module, name } => {
            if output.state.is_some() || output.listitems.is_some() || output.dictitems.is_some() {
                return Err(SerializationError::ProtocolUnsupported {
                    node_path: format!("{module}.{name}"),
                    reason: "a Global hook cannot carry state/listitems/dictitems".to_string(),
                });
            }
            return Ok(Value::Global {
                module: module.into(),
                name: name.into(),
            });
        }
        ReduceHook::NewObjEx { class } => {
            return Err(SerializationError::ProtocolUnsupported {
                node_path: format!("{}.{}", class.0, class.1),
                reason: "__newobj_ex__-style keyword construction is not supported".to_string(),
            });
        }
        ReduceHook::ExtensionCode(_) => {
            return Err(SerializationError::ExtensionCodeUnsupported {
                node_path: "<reduced value>".to_string(),
            });
        }
    };

    let mut record = ReductionRecord::new(constructor);
    record.state = output.state;
    record.listitems = output.listitems;
    record.dictitems = output.dictitems;

    Ok(Value::Reduction(Rc::new(record)))
}

/// Resolve a [`Constructor`] through `resolver` and allocate the instance
/// shell, without applying state yet. Split out from [`rebuild_instance`]
/// so a caller walking a container can memoize the shell under its soft-link
/// target before recursing into state/listitems/dictitems — the load-side
/// counterpart of cycle support, needed for a self-referencing instance to
/// resolve back to itself instead of looping (see
/// `crate::walker::ImportSession::read_reduction`).
pub fn allocate_instance(
    constructor: &Constructor,
    resolver: &dyn SymbolResolver,
) -> Result<Rc<RefCell<dyn Instance>>, DeserializationError> {
    match constructor {
        Constructor::Class { module, name, args } => {
            let symbol = resolver
                .resolve(module, name)
                .map_err(|e| resolve_error_to_deserialization(module, name, e))?;
            match symbol {
                Symbol::Class(class) => class
                    .allocate(args)
                    .map_err(|e| resolve_error_to_deserialization(module, name, e)),
                Symbol::Function(_) => Err(DeserializationError::MissingConstructor {
                    node_path: format!("{module}.{name}"),
                }),
            }
        }
        Constructor::Function { module, name, args } => {
            let symbol = resolver
                .resolve(module, name)
                .map_err(|e| resolve_error_to_deserialization(module, name, e))?;
            match symbol {
                Symbol::Function(function) => function
                    .call(args)
                    .map_err(|e| resolve_error_to_deserialization(module, name, e)),
                Symbol::Class(_) => Err(DeserializationError::MissingConstructor {
                    node_path: format!("{module}.{name}"),
                }),
            }
        }
    }
}

/// Apply an already-read state/listitems/dictitems triad to an allocated
/// instance shell, in that order (mirroring `load_build_py3`).
pub fn apply_reduction(
    instance: &Rc<RefCell<dyn Instance>>,
    state: Option<Value>,
    listitems: Option<Vec<Value>>,
    dictitems: Option<Vec<(Value, Value)>>,
) -> Result<(), DeserializationError> {
    if let Some(state) = state {
        instance.borrow_mut().set_state(state)?;
    }
    if let Some(items) = listitems {
        for item in items {
            instance.borrow_mut().append_item(item)?;
        }
    }
    if let Some(items) = dictitems {
        for (key, value) in items {
            instance.borrow_mut().assign_item(key, value)?;
        }
    }
    Ok(())
}

/// Rebuild a live instance from a [`ReductionRecord`] in one call:
/// allocate then apply. Callers that need cycle support (a container
/// walker) should call [`allocate_instance`] and [`apply_reduction`]
/// separately instead, memoizing the shell in between.
pub fn rebuild_instance(
    record: &ReductionRecord,
    resolver: &dyn SymbolResolver,
) -> Result<Rc<RefCell<dyn Instance>>, DeserializationError> {
    let instance = allocate_instance(&record.constructor, resolver)?;
    apply_reduction(
        &instance,
        record.state.clone(),
        record.listitems.clone(),
        record.dictitems.clone(),
    )?;
    Ok(instance)
}

fn resolve_error_to_deserialization(
    module: &str,
    name: &str,
    err: ResolveError,
) -> DeserializationError {
    let reason = err.to_string();
    DeserializationError::UnresolvedSymbol {
        module: module.to_string(),
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instance::DynamicInstance;

    #[derive(Debug)]
    struct GlobalLike;

    impl Instance for GlobalLike {
        fn class_like(&self) -> Option<(String, String)> {
            Some(("math".to_string(), "pi".to_string()))
        }

        fn reduce(&self) -> Result<ReduceOutput, SerializationError> {
            unreachable!("class_like should short-circuit")
        }

        fn eq_instance(&self, other: &dyn Instance) -> bool {
            other.as_any().downcast_ref::<GlobalLike>().is_some()
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_reduce_class_like_short_circuits_to_global() {
        let value = reduce_instance(&GlobalLike).unwrap();
        assert!(matches!(value, Value::Global { .. }));
    }

    #[test]
    fn test_reduce_dynamic_instance_produces_reduction_record() {
        let inst = DynamicInstance::new("tests", "Record")
            .with_field("a", Value::Number(crate::value::Number::Int(1)));
        let value = reduce_instance(&inst).unwrap();
        match value {
            Value::Reduction(record) => {
                assert!(matches!(record.constructor, Constructor::Class { .. }));
                assert!(record.state.is_some());
            }
            _ => panic!("expected a Reduction value"),
        }
    }

    #[derive(Debug)]
    struct RejectNewObjEx;

    impl Instance for RejectNewObjEx {
        fn reduce(&self) -> Result<ReduceOutput, SerializationError> {
            Ok(ReduceOutput::new(ReduceHook::NewObjEx {
                class: ("tests".to_string(), "Rejected".to_string()),
            }))
        }

        fn eq_instance(&self, other: &dyn Instance) -> bool {
            other.as_any().downcast_ref::<RejectNewObjEx>().is_some()
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_reduce_rejects_newobj_ex() {
        let err = reduce_instance(&RejectNewObjEx).unwrap_err();
        assert!(matches!(err, SerializationError::ProtocolUnsupported { .. }));
    }

    #[test]
    fn test_rebuild_roundtrips_dynamic_instance() {
        let mut registry = ProcessSymbolRegistry::new();

        #[derive(Debug)]
        struct RecordClass;
        impl ClassSymbol for RecordClass {
            fn allocate(
                &self,
                _args: &[Value],
            ) -> Result<Rc<RefCell<dyn Instance>>, ResolveError> {
                Ok(Rc::new(RefCell::new(DynamicInstance::new("tests", "Record"))))
            }

            fn qualified_name(&self) -> (String, String) {
                ("tests".to_string(), "Record".to_string())
            }
        }

        registry.register_class(Rc::new(RecordClass));

        let inst = DynamicInstance::new("tests", "Record")
            .with_field("a", Value::Number(crate::value::Number::Int(1)));
        let reduced = reduce_instance(&inst).unwrap();
        let record = match reduced {
            Value::Reduction(r) => r,
            _ => panic!("expected Reduction"),
        };

        let rebuilt = rebuild_instance(&record, &registry).unwrap();
        let rebuilt_ref = rebuilt.borrow();
        let dynamic = rebuilt_ref.as_any().downcast_ref::<DynamicInstance>().unwrap();
        assert_eq!(
            dynamic.fields.get("a"),
            Some(&Value::Number(crate::value::Number::Int(1)))
        );
    }
}
