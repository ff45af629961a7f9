//! The recursive export/import walker (spec.md Sec.4.3): owns the
//! identity memo and drives every codec and reduction call. Nothing
//! outside this module recurses through a value graph.
//!
//! Identity is tracked by `Rc`/`Rc<RefCell<_>>` pointer address rather
//! than the original implementation's Python `id()`. This sidesteps the
//! address-reuse hazard spec.md Sec.5 warns about: a pointer is only
//! reused once every `Rc` clone referencing it is dropped, and the
//! walker holds a clone (the pin list, mirroring the original's
//! `h5_export` memo-keeps-objects-alive behavior) for the entire
//! traversal, so reuse cannot happen mid-walk.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::codec::{array, bytes, collection, path, scalar, text};
use crate::config::WalkerConfig;
use crate::container::{Hdf5Container, NodeHandle};
use crate::error::{DeserializationError, SerializationError};
use crate::reduction::{self, SymbolResolver};
use crate::registry::TypeRegistry;
use crate::types::{ValueId, ValueIdAllocator};
use crate::value::{PathFlavor, Value};

const TYPE_ATTR: &str = "type";
const CLASS_MODULE_ATTR: &str = "class_module";
const CLASS_NAME_ATTR: &str = "class_name";
const CTOR_KIND_ATTR: &str = "ctor_kind";

fn identity_key(value: &Value) -> Option<usize> {
    match value {
        Value::Text(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Bytes(rc) | Value::LegacyBytes(rc) => Some(Rc::as_ptr(rc) as *const u8 as usize),
        Value::List(rc) | Value::Tuple(rc) | Value::Set(rc) => {
            Some(Rc::as_ptr(rc) as *const () as usize)
        }
        Value::DictStr(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Dict(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Array(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Reduction(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Instance(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
        Value::Absent
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Path(..)
        | Value::Global { .. } => None,
    }
}

/// Export-side state: one per `dump` call.
pub struct ExportSession<'a> {
    container: &'a Hdf5Container,
    settings: &'a WalkerConfig,
    id_alloc: RefCell<ValueIdAllocator>,
    /// identity pointer -> (assigned id, canonical container path)
    memo: RefCell<HashMap<usize, (ValueId, String)>>,
    /// Keeps every observed `Value` alive for the session so its
    /// identity pointer cannot be reused mid-walk.
    pins: RefCell<Vec<Value>>,
}

impl<'a> ExportSession<'a> {
    pub fn new(container: &'a Hdf5Container, settings: &'a WalkerConfig) -> Self {
        Self {
            container,
            settings,
            id_alloc: RefCell::new(ValueIdAllocator::new()),
            memo: RefCell::new(HashMap::new()),
            pins: RefCell::new(Vec::new()),
        }
    }

    /// Writes `value` under the container's fixed top-level namespace
    /// group (spec.md Sec.4.1/External Interfaces: "root group contains
    /// one child named `h5it`").
    pub fn export_root(&self, value: &Value) -> Result<(), SerializationError> {
        let root = self.container.root().map_err(|source| SerializationError::Container {
            node_path: "/".to_string(),
            source,
        })?;
        let ns_group = self.container.create_group(&root, crate::NAMESPACE).map_err(|source| {
            SerializationError::Container {
                node_path: format!("/{}", crate::NAMESPACE),
                source,
            }
        })?;
        self.export_value(&ns_group, &format!("/{}", crate::NAMESPACE), "value", value)?;
        Ok(())
    }

    fn export_value(
        &self,
        parent: &NodeHandle,
        parent_path: &str,
        name: &str,
        value: &Value,
    ) -> Result<NodeHandle, SerializationError> {
        let child_path = format!("{parent_path}/{name}");

        if let Some(key) = identity_key(value) {
            if self.settings.pin_live_values {
                self.pins.borrow_mut().push(value.clone());
            }
            if let Some((_, canonical)) = self.memo.borrow().get(&key).cloned() {
                self.container
                    .create_soft_link(parent, name, &canonical)
                    .map_err(|source| SerializationError::Container {
                        node_path: child_path.clone(),
                        source,
                    })?;
                return self.container.open_child(parent, name).map_err(|source| {
                    SerializationError::Container {
                        node_path: child_path,
                        source,
                    }
                });
            }
            let id = self.id_alloc.borrow_mut().alloc();
            self.memo.borrow_mut().insert(key, (id, child_path.clone()));
        }

        self.write_physical(parent, parent_path, name, value)
    }

    fn write_physical(
        &self,
        parent: &NodeHandle,
        parent_path: &str,
        name: &str,
        value: &Value,
    ) -> Result<NodeHandle, SerializationError> {
        let child_path = format!("{parent_path}/{name}");
        match value {
            Value::Absent => scalar::write_absent(self.container, parent, name),
            Value::Bool(b) => scalar::write_bool(self.container, parent, name, *b),
            Value::Number(n) => scalar::write_number(self.container, parent, name, n),
            Value::Text(s) => text::write_text(self.container, parent, name, s),
            Value::Bytes(b) => bytes::write_bytes(self.container, parent, name, b),
            Value::LegacyBytes(b) => bytes::write_bytes(self.container, parent, name, b),
            Value::Path(flavor, s) => path::write_path(self.container, parent, name, *flavor, s),
            Value::Array(a) => array::write_array(self.container, parent, name, a),
            Value::Global { module, name: sym } => self.write_global(parent, name, &child_path, module, sym),
            Value::List(items) => self.write_sequence(parent, name, &child_path, items, "list"),
            Value::Tuple(items) => self.write_sequence(parent, name, &child_path, items, "tuple"),
            Value::DictStr(map) => {
                let group = self
                    .container
                    .create_group(parent, name)
                    .map_err(|source| SerializationError::Container {
                        node_path: child_path.clone(),
                        source,
                    })?;
                self.set_tag(&group, &child_path, "dict")?;
                for (key, val) in map.iter() {
                    self.export_value(&group, &child_path, key, val)?;
                }
                Ok(group)
            }
            Value::Dict(pairs) => {
                let group = self
                    .container
                    .create_group(parent, name)
                    .map_err(|source| SerializationError::Container {
                        node_path: child_path.clone(),
                        source,
                    })?;
                self.set_tag(&group, &child_path, "dict_hashed")?;
                self.write_hashed_pairs(&group, &child_path, pairs)?;
                Ok(group)
            }
            Value::Set(items) => {
                let group = self
                    .container
                    .create_group(parent, name)
                    .map_err(|source| SerializationError::Container {
                        node_path: child_path.clone(),
                        source,
                    })?;
                self.set_tag(&group, &child_path, "set")?;
                for item in items.iter() {
                    if !collection::is_hashable_key(item) {
                        return Err(SerializationError::UnhashableKey {
                            node_path: child_path.clone(),
                            kind: item.kind_name().to_string(),
                        });
                    }
                    let child_name = collection::hash_key_name(item);
                    self.export_value(&group, &child_path, &child_name, item)?;
                }
                Ok(group)
            }
            Value::Reduction(record) => self.write_reduction(parent, name, &child_path, record),
            Value::Instance(instance) => {
                let reduced = reduction::reduce_instance(&*instance.borrow())?;
                match reduced {
                    Value::Reduction(record) => {
                        self.write_reduction(parent, name, &child_path, &record)
                    }
                    Value::Global { module, name: sym } => {
                        self.write_global(parent, name, &child_path, &module, &sym)
                    }
                    other => Err(SerializationError::CannotReduce {
                        kind: other.kind_name().to_string(),
                    }),
                }
            }
        }
    }

    fn write_global(
        &self,
        parent: &NodeHandle,
        name: &str,
        child_path: &str,
        module: &str,
        sym: &str,
    ) -> Result<NodeHandle, SerializationError> {
        let handle = self
            .container
            .create_group(parent, name)
            .map_err(|source| SerializationError::Container {
                node_path: child_path.to_string(),
                source,
            })?;
        self.set_tag(&handle, child_path, "global")?;
        self.set_text_attr(&handle, child_path, "module", module)?;
        self.set_text_attr(&handle, child_path, "name", sym)?;
        Ok(handle)
    }

    fn write_sequence(
        &self,
        parent: &NodeHandle,
        name: &str,
        child_path: &str,
        items: &[Value],
        tag: &str,
    ) -> Result<NodeHandle, SerializationError> {
        let group = self
            .container
            .create_group(parent, name)
            .map_err(|source| SerializationError::Container {
                node_path: child_path.to_string(),
                source,
            })?;
        self.set_tag(&group, child_path, tag)?;
        for (i, item) in items.iter().enumerate() {
            let child_name = collection::index_name(i, items.len());
            self.export_value(&group, child_path, &child_name, item)?;
        }
        Ok(group)
    }

    fn write_hashed_pairs(
        &self,
        group: &NodeHandle,
        group_path: &str,
        pairs: &[(Value, Value)],
    ) -> Result<(), SerializationError> {
        let mut seen = std::collections::HashSet::new();
        for (key, val) in pairs {
            if !collection::is_hashable_key(key) {
                return Err(SerializationError::UnhashableKey {
                    node_path: group_path.to_string(),
                    kind: key.kind_name().to_string(),
                });
            }
            let child_name = collection::hash_key_name(key);
            if !seen.insert(child_name.clone()) {
                if self.settings.fail_on_name_collision {
                    return Err(SerializationError::NameCollision {
                        parent_path: group_path.to_string(),
                        name: child_name,
                    });
                }
                crate::debug_event!("walker", "hash-collision-overwrite", "{group_path}/{child_name}");
                continue;
            }
            let entry_path = format!("{group_path}/{child_name}");
            let entry = self
                .container
                .create_group(group, &child_name)
                .map_err(|source| SerializationError::Container {
                    node_path: entry_path.clone(),
                    source,
                })?;
            self.set_tag(&entry, &entry_path, "pair")?;
            self.export_value(&entry, &entry_path, "key", key)?;
            self.export_value(&entry, &entry_path, "value", val)?;
        }
        Ok(())
    }

    fn write_reduction(
        &self,
        parent: &NodeHandle,
        name: &str,
        child_path: &str,
        record: &reduction::ReductionRecord,
    ) -> Result<NodeHandle, SerializationError> {
        let group = self
            .container
            .create_group(parent, name)
            .map_err(|source| SerializationError::Container {
                node_path: child_path.to_string(),
                source,
            })?;
        self.set_tag(&group, child_path, "reduction")?;

        let (ctor_kind, module, ctor_name, args) = match &record.constructor {
            reduction::Constructor::Class { module, name, args } => ("class", module, name, args),
            reduction::Constructor::Function { module, name, args } => {
                ("function", module, name, args)
            }
        };
        self.set_text_attr(&group, child_path, CTOR_KIND_ATTR, ctor_kind)?;
        self.set_text_attr(&group, child_path, CLASS_MODULE_ATTR, module)?;
        self.set_text_attr(&group, child_path, CLASS_NAME_ATTR, ctor_name)?;

        let args_group = self
            .container
            .create_group(&group, "args")
            .map_err(|source| SerializationError::Container {
                node_path: format!("{child_path}/args"),
                source,
            })?;
        self.set_tag(&args_group, &format!("{child_path}/args"), "tuple")?;
        for (i, arg) in args.iter().enumerate() {
            let child_name = collection::index_name(i, args.len());
            self.export_value(&args_group, &format!("{child_path}/args"), &child_name, arg)?;
        }

        if let Some(state) = &record.state {
            self.export_value(&group, child_path, "state", state)?;
        }
        if let Some(items) = &record.listitems {
            self.write_sequence(&group, "listitems", child_path, items, "list")?;
        }
        if let Some(items) = &record.dictitems {
            let pairs: Vec<(Value, Value)> = items.clone();
            let di_path = format!("{child_path}/dictitems");
            let di_group = self
                .container
                .create_group(&group, "dictitems")
                .map_err(|source| SerializationError::Container {
                    node_path: di_path.clone(),
                    source,
                })?;
            self.set_tag(&di_group, &di_path, "list")?;
            for (i, (key, val)) in pairs.iter().enumerate() {
                let child_name = collection::index_name(i, pairs.len());
                let tuple = Value::tuple(vec![key.clone(), val.clone()]);
                self.export_value(&di_group, &di_path, &child_name, &tuple)?;
            }
        }

        Ok(group)
    }

    fn set_tag(
        &self,
        handle: &NodeHandle,
        path: &str,
        tag: &str,
    ) -> Result<(), SerializationError> {
        self.set_text_attr(handle, path, TYPE_ATTR, tag)
    }

    fn set_text_attr(
        &self,
        handle: &NodeHandle,
        path: &str,
        key: &str,
        value: &str,
    ) -> Result<(), SerializationError> {
        self.container
            .set_attr(handle, key, &crate::container::AttrValue::Str(value.to_string()))
            .map_err(|source| SerializationError::Container {
                node_path: path.to_string(),
                source,
            })
    }
}

/// Import-side state: one per `load` call.
pub struct ImportSession<'a> {
    container: &'a Hdf5Container,
    resolver: &'a dyn SymbolResolver,
    encoding: crate::Encoding,
    /// canonical container path -> already-imported value, used to turn
    /// soft links back into shared `Rc` identity.
    memo: RefCell<HashMap<String, Value>>,
    /// shares one allocation across reduction records that name the same
    /// module/class, mirroring `load_build_py3`'s `sys.intern` call.
    interner: RefCell<reduction::interner::Interner>,
}

impl<'a> ImportSession<'a> {
    pub fn new(
        container: &'a Hdf5Container,
        resolver: &'a dyn SymbolResolver,
        encoding: crate::Encoding,
    ) -> Self {
        Self {
            container,
            resolver,
            encoding,
            memo: RefCell::new(HashMap::new()),
            interner: RefCell::new(reduction::interner::Interner::new()),
        }
    }

    /// Reads back the value stored under the container's fixed top-level
    /// namespace group.
    pub fn import_root(&self) -> Result<Value, DeserializationError> {
        let root = self.container.root().map_err(|source| DeserializationError::Container {
            node_path: "/".to_string(),
            source,
        })?;
        let names = self.container.list_children(&root).map_err(|source| {
            DeserializationError::Container {
                node_path: "/".to_string(),
                source,
            }
        })?;
        if !names.iter().any(|n| n == crate::NAMESPACE) {
            return Err(DeserializationError::MissingNamespace {
                namespace: crate::NAMESPACE.to_string(),
            });
        }
        let ns_group = self.container.open_child(&root, crate::NAMESPACE).map_err(|source| {
            DeserializationError::Container {
                node_path: format!("/{}", crate::NAMESPACE),
                source,
            }
        })?;
        self.import_value(&ns_group, &format!("/{}", crate::NAMESPACE), "value")
    }

    fn import_value(
        &self,
        parent: &NodeHandle,
        parent_path: &str,
        name: &str,
    ) -> Result<Value, DeserializationError> {
        let child_path = format!("{parent_path}/{name}");

        if let Some(target) = self.container.resolve_soft_link(parent, name).map_err(|source| {
            DeserializationError::Container {
                node_path: child_path.clone(),
                source,
            }
        })? {
            if let Some(existing) = self.memo.borrow().get(&target).cloned() {
                return Ok(existing);
            }
            let handle = self.container.open_child(parent, name).map_err(|source| {
                DeserializationError::Container {
                    node_path: child_path.clone(),
                    source,
                }
            })?;
            let value = self.read_physical(&handle, &target)?;
            self.memo.borrow_mut().insert(target, value.clone());
            return Ok(value);
        }

        let handle = self.container.open_child(parent, name).map_err(|source| {
            DeserializationError::Container {
                node_path: child_path.clone(),
                source,
            }
        })?;
        let value = self.read_physical(&handle, &child_path)?;
        if identity_key(&value).is_some() {
            self.memo.borrow_mut().insert(child_path, value.clone());
        }
        Ok(value)
    }

    fn read_physical(&self, handle: &NodeHandle, path: &str) -> Result<Value, DeserializationError> {
        let tag = self
            .container
            .get_attr_string(handle, TYPE_ATTR)
            .map_err(|source| DeserializationError::Container {
                node_path: path.to_string(),
                source,
            })?
            .ok_or_else(|| DeserializationError::MissingTypeAttribute {
                node_path: path.to_string(),
            })?;

        let registry = TypeRegistry::global();
        if registry.is_reduction_tag(&tag) {
            return self.read_reduction(handle, path);
        }

        match registry.kind_for_tag(&tag) {
            Some("Absent") => Ok(Value::Absent),
            Some("Bool") => Ok(Value::Bool(scalar::read_bool(self.container, handle)?)),
            Some("Number") => Ok(Value::Number(scalar::read_number(self.container, handle)?)),
            Some("Text") => Ok(Value::text(text::read_text(self.container, handle)?)),
            Some("Bytes") => Ok(Value::bytes(bytes::read_bytes(self.container, handle)?)),
            Some("LegacyBytes") => {
                let raw = bytes::read_bytes(self.container, handle)?;
                match self.encoding {
                    crate::Encoding::Ascii => {
                        let text = String::from_utf8(raw).map_err(|e| {
                            DeserializationError::General(format!(
                                "legacy bytes at '{path}' are not valid ASCII/UTF-8: {e}"
                            ))
                        })?;
                        Ok(Value::text(text))
                    }
                    crate::Encoding::Bytes => Ok(Value::Bytes(Rc::from(raw))),
                }
            }
            Some("Path") => {
                let flavor = if tag == "pathlib.PosixPath" {
                    PathFlavor::Posix
                } else {
                    PathFlavor::Windows
                };
                Ok(Value::Path(flavor, Rc::from(path::read_path(self.container, handle, flavor)?.as_str())))
            }
            Some("Array") => Ok(Value::Array(Rc::new(array::read_array(self.container, handle)?))),
            Some("Global") => {
                let module = self
                    .container
                    .get_attr_string(handle, "module")
                    .map_err(|source| DeserializationError::Container {
                        node_path: path.to_string(),
                        source,
                    })?
                    .unwrap_or_default();
                let name = self
                    .container
                    .get_attr_string(handle, "name")
                    .map_err(|source| DeserializationError::Container {
                        node_path: path.to_string(),
                        source,
                    })?
                    .unwrap_or_default();
                Ok(Value::Global {
                    module: module.into(),
                    name: name.into(),
                })
            }
            Some("List") => self.read_sequence(handle, path).map(Value::list),
            Some("Tuple") => self.read_sequence(handle, path).map(Value::tuple),
            Some("DictStr") => self.read_dict_str(handle, path),
            Some("Dict") => self.read_dict_hashed(handle, path),
            Some("Set") => self.read_set(handle, path),
            _ => Err(DeserializationError::UnknownTag {
                node_path: path.to_string(),
                tag,
            }),
        }
    }

    fn read_sequence(&self, handle: &NodeHandle, path: &str) -> Result<Vec<Value>, DeserializationError> {
        let names = self.container.list_children(handle).map_err(|source| {
            DeserializationError::Container {
                node_path: path.to_string(),
                source,
            }
        })?;
        let indices = collection::check_contiguous(path, &names)?;
        let mut items = vec![Value::Absent; names.len()];
        for (name, idx) in names.iter().zip(indices.iter()) {
            items[*idx] = self.import_value(handle, path, name)?;
        }
        Ok(items)
    }

    fn read_dict_str(&self, handle: &NodeHandle, path: &str) -> Result<Value, DeserializationError> {
        let names = self.container.list_children(handle).map_err(|source| {
            DeserializationError::Container {
                node_path: path.to_string(),
                source,
            }
        })?;
        let mut map = indexmap::IndexMap::new();
        for name in names {
            let value = self.import_value(handle, path, &name)?;
            map.insert(name, value);
        }
        Ok(Value::DictStr(Rc::new(map)))
    }

    fn read_dict_hashed(&self, handle: &NodeHandle, path: &str) -> Result<Value, DeserializationError> {
        let names = self.container.list_children(handle).map_err(|source| {
            DeserializationError::Container {
                node_path: path.to_string(),
                source,
            }
        })?;
        let mut pairs = Vec::with_capacity(names.len());
        for name in names {
            let entry_path = format!("{path}/{name}");
            let entry = self.container.open_child(handle, &name).map_err(|source| {
                DeserializationError::Container {
                    node_path: entry_path.clone(),
                    source,
                }
            })?;
            let key = self.import_value(&entry, &entry_path, "key")?;
            let value = self.import_value(&entry, &entry_path, "value")?;
            pairs.push((key, value));
        }
        Ok(Value::Dict(Rc::new(pairs)))
    }

    fn read_set(&self, handle: &NodeHandle, path: &str) -> Result<Value, DeserializationError> {
        let names = self.container.list_children(handle).map_err(|source| {
            DeserializationError::Container {
                node_path: path.to_string(),
                source,
            }
        })?;
        let mut items = Vec::with_capacity(names.len());
        for name in names {
            items.push(self.import_value(handle, path, &name)?);
        }
        Ok(Value::Set(Rc::new(items)))
    }

    fn read_reduction(&self, handle: &NodeHandle, path: &str) -> Result<Value, DeserializationError> {
        let ctor_kind = self
            .container
            .get_attr_string(handle, CTOR_KIND_ATTR)
            .map_err(|source| DeserializationError::Container {
                node_path: path.to_string(),
                source,
            })?
            .ok_or_else(|| DeserializationError::MissingConstructor {
                node_path: path.to_string(),
            })?;
        let module = self
            .container
            .get_attr_string(handle, CLASS_MODULE_ATTR)
            .map_err(|source| DeserializationError::Container {
                node_path: path.to_string(),
                source,
            })?
            .unwrap_or_default();
        let name = self
            .container
            .get_attr_string(handle, CLASS_NAME_ATTR)
            .map_err(|source| DeserializationError::Container {
                node_path: path.to_string(),
                source,
            })?
            .unwrap_or_default();
        let module = self.interner.borrow_mut().intern(&module);
        let name = self.interner.borrow_mut().intern(&name);

        let args_path = format!("{path}/args");
        let args_group = self.container.open_child(handle, "args").map_err(|source| {
            DeserializationError::Container {
                node_path: args_path.clone(),
                source,
            }
        })?;
        let args = self.read_sequence(&args_group, &args_path)?;

        let constructor = if ctor_kind == "function" {
            reduction::Constructor::Function { module, name, args }
        } else {
            reduction::Constructor::Class { module, name, args }
        };

        // Allocate the instance shell and memoize it under this node's path
        // *before* reading state/listitems/dictitems: a self-referencing
        // instance's state contains a soft link back to this same path
        // (the export side pre-registers the same way, see
        // `ExportSession::export_value`), and that link must resolve to
        // this shell rather than re-entering `read_physical` and looping.
        let instance = reduction::allocate_instance(&constructor, self.resolver)?;
        self.memo
            .borrow_mut()
            .insert(path.to_string(), Value::Instance(instance.clone()));

        let mut state = None;
        let mut listitems = None;
        let mut dictitems = None;

        let names = self.container.list_children(handle).map_err(|source| {
            DeserializationError::Container {
                node_path: path.to_string(),
                source,
            }
        })?;
        if names.iter().any(|n| n == "state") {
            state = Some(self.import_value(handle, path, "state")?);
        }
        if names.iter().any(|n| n == "listitems") {
            let group = self.container.open_child(handle, "listitems").map_err(|source| {
                DeserializationError::Container {
                    node_path: format!("{path}/listitems"),
                    source,
                }
            })?;
            listitems = Some(self.read_sequence(&group, &format!("{path}/listitems"))?);
        }
        if names.iter().any(|n| n == "dictitems") {
            let group = self.container.open_child(handle, "dictitems").map_err(|source| {
                DeserializationError::Container {
                    node_path: format!("{path}/dictitems"),
                    source,
                }
            })?;
            let tuples = self.read_sequence(&group, &format!("{path}/dictitems"))?;
            let mut pairs = Vec::with_capacity(tuples.len());
            for t in tuples {
                if let Value::Tuple(kv) = t {
                    if kv.len() == 2 {
                        pairs.push((kv[0].clone(), kv[1].clone()));
                        continue;
                    }
                }
                return Err(DeserializationError::General(format!(
                    "dictitems entry at '{path}/dictitems' is not a 2-tuple"
                )));
            }
            dictitems = Some(pairs);
        }

        reduction::apply_reduction(&instance, state, listitems, dictitems)?;
        Ok(Value::Instance(instance))
    }
}

/// Used by tests that want a shell `Instance` without going through the
/// resolver, e.g. to assert on `identity_key`.
pub fn rc_ptr_identity(a: &Value, b: &Value) -> bool {
    match (identity_key(a), identity_key(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn test_identity_key_shared_rc_matches() {
        let shared = Value::list(vec![Value::Number(Number::Int(1))]);
        let alias = shared.clone();
        assert!(rc_ptr_identity(&shared, &alias));
    }

    #[test]
    fn test_identity_key_distinct_rc_differs() {
        let a = Value::list(vec![Value::Number(Number::Int(1))]);
        let b = Value::list(vec![Value::Number(Number::Int(1))]);
        assert!(!rc_ptr_identity(&a, &b));
    }

    #[test]
    fn test_scalars_have_no_identity_key() {
        assert!(identity_key(&Value::Bool(true)).is_none());
        assert!(identity_key(&Value::Number(Number::Int(1))).is_none());
    }
}
