//! Script execution context
//!
//! A script never touches process-wide state. Everything it can read or
//! write is handed to it through a [`ScriptContext`]: the scheduler, the
//! host globals, the console, the imports of its collaborator module and the
//! output slot the host reads once the run is over.

pub mod console;
pub mod hello;

pub use console::{format_line, Console, RecordingConsole, StdoutConsole, TracingConsole};

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::runtime::hostfunc::HostFunctionRegistry;
use crate::runtime::scheduler::Scheduler;
use crate::runtime::value::ScriptValue;
use crate::runtime::HostError;

/// The `output` cell. Clones share the same cell.
#[derive(Debug, Clone)]
pub struct OutputSlot {
    cell: Rc<RefCell<ScriptValue>>,
}

impl OutputSlot {
    pub fn new(initial: ScriptValue) -> Self {
        Self {
            cell: Rc::new(RefCell::new(initial)),
        }
    }

    /// Overwrite the value
    pub fn set(
        &self,
        value: ScriptValue,
    ) {
        *self.cell.borrow_mut() = value;
    }

    /// Current value
    pub fn get(&self) -> ScriptValue {
        self.cell.borrow().clone()
    }

    /// One-line report: `b<is bool>,f<is float>,i<is int>,s<is string>,<value>`
    pub fn describe(&self) -> String {
        describe_value(&self.cell.borrow())
    }
}

impl Default for OutputSlot {
    fn default() -> Self {
        Self::new(ScriptValue::Null)
    }
}

pub(crate) fn describe_value(value: &ScriptValue) -> String {
    format!(
        "b{},f{},i{},s{},{}",
        value.is_bool(),
        value.is_float(),
        value.is_integer(),
        value.is_string(),
        value
    )
}

/// Constants exported by the script's collaborator module.
#[derive(Debug, Clone, Default)]
pub struct ModuleImports {
    values: IndexMap<String, ScriptValue>,
}

impl ModuleImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        name: &str,
        value: impl Into<ScriptValue>,
    ) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Imported value, `undefined` if the module does not export it
    pub fn get(
        &self,
        name: &str,
    ) -> ScriptValue {
        self.values.get(name).cloned().unwrap_or_default()
    }
}

/// Everything a running script may use.
pub struct ScriptContext {
    scheduler: Scheduler,
    globals: HostFunctionRegistry,
    console: Rc<dyn Console>,
    imports: ModuleImports,
    output: OutputSlot,
}

impl ScriptContext {
    pub fn new(
        scheduler: Scheduler,
        globals: HostFunctionRegistry,
        console: Rc<dyn Console>,
    ) -> Self {
        Self {
            scheduler,
            globals,
            console,
            imports: ModuleImports::new(),
            output: OutputSlot::default(),
        }
    }

    pub fn with_imports(
        mut self,
        imports: ModuleImports,
    ) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_output(
        mut self,
        output: OutputSlot,
    ) -> Self {
        self.output = output;
        self
    }

    /// Call a host global
    pub fn call(
        &self,
        name: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue, HostError> {
        self.globals.call(name, args)
    }

    /// `console.log`
    pub fn log(
        &self,
        args: &[ScriptValue],
    ) {
        self.console.log(args);
    }

    /// Read an import of the collaborator module
    pub fn import(
        &self,
        name: &str,
    ) -> ScriptValue {
        self.imports.get(name)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn console(&self) -> Rc<dyn Console> {
        self.console.clone()
    }

    pub fn output(&self) -> &OutputSlot {
        &self.output
    }
}

impl std::fmt::Debug for ScriptContext {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("scheduler", &self.scheduler)
            .field("globals", &self.globals.len())
            .field("imports", &self.imports)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
