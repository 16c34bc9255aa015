//! Host function registry
//!
//! Maps the global names a script calls (`get_url`, `hello`, ...) to Rust
//! closures. Lookup of a name that was never installed fails the same way an
//! undefined global does in a script: with an error that ends the run.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::runtime::error::HostError;
use crate::runtime::value::{ScriptFunction, ScriptValue, ValueType};

type NativeFn = dyn Fn(&[ScriptValue]) -> Result<ScriptValue, HostError>;

/// Host function definition
#[derive(Clone)]
pub struct HostFunction {
    /// Global name
    pub name: &'static str,
    /// Minimum number of arguments
    pub arity: usize,
    func: Rc<NativeFn>,
}

impl HostFunction {
    pub fn new<F>(
        name: &'static str,
        arity: usize,
        func: F,
    ) -> Self
    where
        F: Fn(&[ScriptValue]) -> Result<ScriptValue, HostError> + 'static,
    {
        Self {
            name,
            arity,
            func: Rc::new(func),
        }
    }

    /// Call with arity checking.
    pub fn call(
        &self,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, HostError> {
        if args.len() < self.arity {
            return Err(HostError::Arity {
                name: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.func)(args)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Host function registry, in installation order
#[derive(Debug, Default, Clone)]
pub struct HostFunctionRegistry {
    functions: IndexMap<&'static str, HostFunction>,
}

impl HostFunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            functions: IndexMap::new(),
        }
    }

    /// Install a host function, replacing any previous one with the same name
    pub fn register(
        &mut self,
        func: HostFunction,
    ) {
        if let Some(previous) = self.functions.insert(func.name, func) {
            warn!("host function {} was replaced", previous.name);
        }
    }

    /// Look up a host function
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&HostFunction> {
        self.functions.get(name)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.functions.contains_key(name)
    }

    /// Installed functions, in installation order
    pub fn functions(&self) -> impl Iterator<Item = &HostFunction> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Call a host function by global name
    pub fn call(
        &self,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, HostError> {
        let func = self
            .get(name)
            .ok_or_else(|| HostError::UndefinedFunction(name.to_string()))?;
        trace!("host call {}({} args)", name, args.len());
        func.call(args)
    }
}

// === argument helpers ===

fn mismatch(
    name: &str,
    index: usize,
    expected: ValueType,
    found: &ScriptValue,
) -> HostError {
    HostError::TypeMismatch {
        name: name.to_string(),
        index,
        expected,
        found: found.value_type(),
    }
}

fn arg<'a>(
    name: &str,
    args: &'a [ScriptValue],
    index: usize,
) -> Result<&'a ScriptValue, HostError> {
    args.get(index).ok_or_else(|| HostError::Arity {
        name: name.to_string(),
        expected: index + 1,
        found: args.len(),
    })
}

/// String argument at `index`
pub fn arg_str<'a>(
    name: &str,
    args: &'a [ScriptValue],
    index: usize,
) -> Result<&'a str, HostError> {
    let value = arg(name, args, index)?;
    value
        .as_str()
        .ok_or_else(|| mismatch(name, index, ValueType::String, value))
}

/// Integer argument at `index`; whole floats are accepted
pub fn arg_int(
    name: &str,
    args: &[ScriptValue],
    index: usize,
) -> Result<i64, HostError> {
    let value = arg(name, args, index)?;
    value
        .to_int()
        .ok_or_else(|| mismatch(name, index, ValueType::Int, value))
}

/// Callback argument at `index`
pub fn arg_function(
    name: &str,
    args: &[ScriptValue],
    index: usize,
) -> Result<ScriptFunction, HostError> {
    let value = arg(name, args, index)?;
    value
        .as_function()
        .cloned()
        .ok_or_else(|| mismatch(name, index, ValueType::Function, value))
}

/// Any argument at `index`, `undefined` when missing
pub fn arg_or_undefined(
    args: &[ScriptValue],
    index: usize,
) -> ScriptValue {
    args.get(index).cloned().unwrap_or_default()
}
