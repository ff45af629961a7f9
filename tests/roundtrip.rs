//! End-to-end `dump`/`load` coverage over a real (temp-file) HDF5
//! container: round-trip equality, identity preservation, cycle support
//! through the reduction path, and rejection of unsupported protocols.

use std::cell::RefCell;
use std::rc::Rc;

use h5graph::reduction::instance::DynamicInstance;
use h5graph::reduction::symbol::{ClassSymbol, ResolveError};
use h5graph::reduction::{Instance, ProcessSymbolRegistry, ReduceHook, ReduceOutput};
use h5graph::value::Number;
use h5graph::{dump, load, SerializationError, Value};

fn temp_path(name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

#[test]
fn test_roundtrip_scalars_and_collections() {
    let (_dir, path) = temp_path("scalars.h5");

    let value = Value::list(vec![
        Value::Absent,
        Value::Bool(true),
        Value::Number(Number::Int(7)),
        Value::Number(Number::Float(2.5)),
        Value::Number(Number::Complex(num_complex::Complex64::new(1.0, -1.0))),
        Value::text("hello"),
        Value::bytes(vec![1u8, 2, 3]),
        Value::tuple(vec![Value::Number(Number::Int(1)), Value::Number(Number::Int(2))]),
    ]);

    dump(&path, &value).expect("dump should succeed");

    let resolver = ProcessSymbolRegistry::new();
    let restored = load(&path, &resolver).expect("load should succeed");

    assert_eq!(value, restored);
}

#[test]
fn test_identity_preserved_for_shared_list() {
    let (_dir, path) = temp_path("identity.h5");

    let shared = Value::list(vec![Value::Number(Number::Int(1))]);
    let graph = Value::tuple(vec![shared.clone(), shared.clone()]);

    dump(&path, &graph).expect("dump should succeed");

    let resolver = ProcessSymbolRegistry::new();
    let restored = load(&path, &resolver).expect("load should succeed");

    let Value::Tuple(items) = restored else {
        panic!("expected a tuple");
    };
    let (Value::List(a), Value::List(b)) = (&items[0], &items[1]) else {
        panic!("expected two lists");
    };
    assert!(
        Rc::ptr_eq(a, b),
        "two positions that shared one Rc before dump must share one Rc after load"
    );
}

#[derive(Debug)]
struct NodeClass;

impl ClassSymbol for NodeClass {
    fn allocate(
        &self,
        _args: &[Value],
    ) -> Result<Rc<RefCell<dyn Instance>>, ResolveError> {
        Ok(Rc::new(RefCell::new(DynamicInstance::new("tests", "Node"))))
    }

    fn qualified_name(&self) -> (String, String) {
        ("tests".to_string(), "Node".to_string())
    }
}

#[test]
fn test_cycle_preserved_through_self_referencing_instance() {
    let (_dir, path) = temp_path("cycle.h5");

    let node: Rc<RefCell<DynamicInstance>> =
        Rc::new(RefCell::new(DynamicInstance::new("tests", "Node")));
    let node_dyn: Rc<RefCell<dyn Instance>> = node.clone();
    node.borrow_mut()
        .fields
        .insert("self".to_string(), Value::Instance(node_dyn.clone()));
    let graph = Value::Instance(node_dyn);

    dump(&path, &graph).expect("a self-referencing instance must still dump");

    let mut resolver = ProcessSymbolRegistry::new();
    resolver.register_class(Rc::new(NodeClass));
    let restored = load(&path, &resolver).expect("load should succeed");

    let Value::Instance(rebuilt) = restored else {
        panic!("expected an Instance");
    };
    let borrowed = rebuilt.borrow();
    let dynamic = borrowed.as_any().downcast_ref::<DynamicInstance>().unwrap();
    let Some(Value::Instance(self_ref)) = dynamic.fields.get("self") else {
        panic!("expected the self field to round-trip as an Instance");
    };
    assert!(
        Rc::ptr_eq(self_ref, &rebuilt),
        "the rebuilt self-reference must point back at the same instance"
    );
}

#[derive(Debug)]
struct RejectedInstance;

impl Instance for RejectedInstance {
    fn reduce(&self) -> Result<ReduceOutput, SerializationError> {
        Ok(ReduceOutput::new(ReduceHook::NewObjEx {
            class: ("tests".to_string(), "Rejected".to_string()),
        }))
    }

    fn eq_instance(&self, other: &dyn Instance) -> bool {
        other.as_any().downcast_ref::<RejectedInstance>().is_some()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn test_newobj_ex_protocol_is_rejected_end_to_end() {
    let (_dir, path) = temp_path("rejected.h5");
    let graph = Value::Instance(Rc::new(RefCell::new(RejectedInstance)));

    let err = dump(&path, &graph).unwrap_err();
    assert!(matches!(err, SerializationError::ProtocolUnsupported { .. }));
    assert!(!path.exists(), "a failed dump must not leave a partial file behind");
}

#[test]
fn test_cross_platform_path_round_trip() {
    use h5graph::value::PathFlavor;

    let (_dir, path) = temp_path("paths.h5");
    let value = Value::Path(PathFlavor::Windows, "C:\\Users\\example\\data.bin".into());

    dump(&path, &value).expect("dump should succeed");

    let resolver = ProcessSymbolRegistry::new();
    let restored = load(&path, &resolver).expect("load should succeed");

    assert_eq!(value, restored);
    let Value::Path(flavor, _) = restored else {
        panic!("expected a Path");
    };
    assert_eq!(flavor, PathFlavor::Windows);
}
