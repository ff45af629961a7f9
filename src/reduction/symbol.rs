//! The module/name resolver capability (spec.md Sec.1, Sec.9
//! "Symbol resolver as capability").
//!
//! In the source implementation, `(module, name) <-> live symbol` is a
//! process-wide, interpreter-level mapping (`whichmodule`/`__import__`).
//! There is no equivalent in a compiled Rust binary: classes and functions
//! are not named at runtime. This crate instead takes the resolver as an
//! injected capability that the caller populates ahead of time with the
//! constructors it wants `load` to be able to reach.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::reduction::instance::Instance;
use crate::value::Value;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("symbol '{module}.{name}' is not registered with this resolver")]
    NotFound { module: String, name: String },

    #[error("constructor '{module}.{name}' rejected its arguments: {reason}")]
    ConstructorFailed {
        module: String,
        name: String,
        reason: String,
    },
}

/// A class constructor: reconstructs an instance shell given the
/// reduction record's positional `args`, mirroring
/// `cls.__new__(cls, *args)` (spec.md Sec.4.4).
pub trait ClassSymbol: fmt::Debug {
    fn allocate(&self, args: &[Value]) -> Result<Rc<RefCell<dyn Instance>>, ResolveError>;
    fn qualified_name(&self) -> (String, String);
}

/// A free function constructor, mirroring the `func(*args)` REDUCE path.
pub trait FunctionSymbol: fmt::Debug {
    fn call(&self, args: &[Value]) -> Result<Rc<RefCell<dyn Instance>>, ResolveError>;
    fn qualified_name(&self) -> (String, String);
}

/// What `resolve` hands back: either flavor of constructor.
#[derive(Clone)]
pub enum Symbol {
    Class(Rc<dyn ClassSymbol>),
    Function(Rc<dyn FunctionSymbol>),
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Class(c) => write!(f, "Symbol::Class({:?})", c.qualified_name()),
            Symbol::Function(c) => write!(f, "Symbol::Function({:?})", c.qualified_name()),
        }
    }
}

/// Save-time: turn a live symbol-like value into its `(module, name)` pair.
/// Load-time: turn a `(module, name)` pair back into a live [`Symbol`].
pub trait SymbolResolver: fmt::Debug {
    fn resolve(&self, module: &str, name: &str) -> Result<Symbol, ResolveError>;

    fn describe_class(&self, symbol: &Rc<dyn ClassSymbol>) -> (String, String) {
        symbol.qualified_name()
    }

    fn describe_function(&self, symbol: &Rc<dyn FunctionSymbol>) -> (String, String) {
        symbol.qualified_name()
    }
}

/// A process-scoped default resolver: callers register constructors ahead
/// of a `load`, mirroring the teacher's provider-registration pattern
/// (`project_resolver::providers`) rather than any runtime code loading.
#[derive(Debug, Default)]
pub struct ProcessSymbolRegistry {
    classes: HashMap<(String, String), Rc<dyn ClassSymbol>>,
    functions: HashMap<(String, String), Rc<dyn FunctionSymbol>>,
}

impl ProcessSymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(&mut self, class: Rc<dyn ClassSymbol>) -> &mut Self {
        self.classes.insert(class.qualified_name(), class);
        self
    }

    pub fn register_function(&mut self, function: Rc<dyn FunctionSymbol>) -> &mut Self {
        self.functions.insert(function.qualified_name(), function);
        self
    }
}

impl SymbolResolver for ProcessSymbolRegistry {
    fn resolve(&self, module: &str, name: &str) -> Result<Symbol, ResolveError> {
        let key = (module.to_string(), name.to_string());
        if let Some(class) = self.classes.get(&key) {
            return Ok(Symbol::Class(class.clone()));
        }
        if let Some(function) = self.functions.get(&key) {
            return Ok(Symbol::Function(function.clone()));
        }
        Err(ResolveError::NotFound {
            module: module.to_string(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::instance::DynamicInstance;

    #[derive(Debug)]
    struct TestClass;

    impl ClassSymbol for TestClass {
        fn allocate(&self, _args: &[Value]) -> Result<Rc<RefCell<dyn Instance>>, ResolveError> {
            Ok(Rc::new(RefCell::new(DynamicInstance::new(
                "tests", "TestClass",
            ))))
        }

        fn qualified_name(&self) -> (String, String) {
            ("tests".to_string(), "TestClass".to_string())
        }
    }

    #[test]
    fn test_resolve_registered_class() {
        let mut registry = ProcessSymbolRegistry::new();
        registry.register_class(Rc::new(TestClass));

        let symbol = registry.resolve("tests", "TestClass").unwrap();
        match symbol {
            Symbol::Class(c) => assert_eq!(c.qualified_name(), ("tests".into(), "TestClass".into())),
            Symbol::Function(_) => panic!("expected a class symbol"),
        }
    }

    #[test]
    fn test_resolve_unknown_symbol_fails() {
        let registry = ProcessSymbolRegistry::new();
        assert!(matches!(
            registry.resolve("nope", "Nothing"),
            Err(ResolveError::NotFound { .. })
        ));
    }
}
