//! Host capabilities
//!
//! Everything a script can reach outside itself goes through one of the
//! port traits below. [`HostBindings`] holds one implementation of each and
//! installs them into a [`HostFunctionRegistry`] under the global names rule
//! scripts use.
//!
//! | global                         | port                 |
//! |--------------------------------|----------------------|
//! | `get_url`                      | [`UrlFetcher`]         |
//! | `hello`                        | [`Greeter`]            |
//! | `notifyOnThingStatesChange`    | [`ThingStateNotifier`] |
//! | `unregisterThingStateListener` | [`ThingStateNotifier`] |
//! | `execThingAction`              | [`ThingRegistry`]      |
//! | `getThingState`                | [`ThingRegistry`]      |
//! | `getAllThingStates`            | [`ThingRegistry`]      |
//! | `cmdThingState`                | [`ThingRegistry`]      |
//! | `setGlobalVar` / `getGlobalVar`| [`VariableStore`]      |
//! | `getNamedInputValue`           | [`VariableStore`]      |
//! | `setNamedOutputValue`          | [`VariableStore`]      |
//! | `ruletype`                     | [`VariableStore`]      |

pub mod stubs;

use std::rc::Rc;

use tracing::debug;

use crate::runtime::hostfunc::{
    arg_function, arg_int, arg_or_undefined, arg_str, HostFunction, HostFunctionRegistry,
};
use crate::runtime::value::{ScriptFunction, ScriptValue, ValueType};
use crate::runtime::HostError;

use self::stubs::{EchoUrlFetcher, MemoryNotifier, MemoryThings, MemoryVariables, RecordingGreeter};

/// Fetches a URL on behalf of a script.
pub trait UrlFetcher {
    fn get_url(
        &self,
        target: &ScriptValue,
    ) -> Result<ScriptValue, HostError>;
}

/// Produces a greeting.
pub trait Greeter {
    fn hello(
        &self,
        name: &str,
    ) -> Result<ScriptValue, HostError>;
}

/// Subscriptions to thing state changes.
pub trait ThingStateNotifier {
    /// Register `callback` for state changes of `thing_id`; returns the
    /// subscription handle shown to the script.
    fn notify_on_thing_states_change(
        &self,
        thing_id: &str,
        callback: ScriptFunction,
    ) -> Result<ScriptValue, HostError>;

    /// Drop a subscription. `Ok(false)` if it was already gone.
    fn unregister(
        &self,
        listener_id: u64,
    ) -> Result<bool, HostError>;
}

/// Access to things: actions and states.
pub trait ThingRegistry {
    fn exec_thing_action(
        &self,
        thing_id: &str,
        action_id: &str,
        arguments: ScriptValue,
    ) -> Result<(), HostError>;

    fn get_thing_state(
        &self,
        thing_id: &str,
        state_name: &str,
        instance: u16,
    ) -> Result<ScriptValue, HostError>;

    fn get_all_thing_states(
        &self,
        thing_id: &str,
    ) -> Result<ScriptValue, HostError>;

    /// Command a state change; `Ok(false)` when the thing refused it.
    fn cmd_thing_state(
        &self,
        thing_id: &str,
        state_name: &str,
        instance: u16,
        value: ScriptValue,
    ) -> Result<bool, HostError>;
}

/// Rule variables: globals shared between rules plus this rule's named
/// inputs and outputs.
pub trait VariableStore {
    fn set_global_var(
        &self,
        name: &str,
        value: ScriptValue,
    );

    fn get_global_var(
        &self,
        name: &str,
    ) -> ScriptValue;

    fn get_named_input(
        &self,
        name: &str,
    ) -> ScriptValue;

    fn set_named_output(
        &self,
        name: &str,
        value: ScriptValue,
    );

    /// Kind of rule the script runs as
    fn rule_type(&self) -> ScriptValue;
}

/// One implementation of every port.
#[derive(Clone)]
pub struct HostBindings {
    urls: Rc<dyn UrlFetcher>,
    greeter: Rc<dyn Greeter>,
    notifier: Rc<dyn ThingStateNotifier>,
    things: Rc<dyn ThingRegistry>,
    variables: Rc<dyn VariableStore>,
}

impl HostBindings {
    /// Bindings backed entirely by the in-memory doubles in [`stubs`].
    pub fn stubs() -> Self {
        Self {
            urls: Rc::new(EchoUrlFetcher),
            greeter: Rc::new(RecordingGreeter::default()),
            notifier: Rc::new(MemoryNotifier::default()),
            things: Rc::new(MemoryThings::default()),
            variables: Rc::new(MemoryVariables::default()),
        }
    }

    pub fn with_url_fetcher(
        mut self,
        urls: Rc<dyn UrlFetcher>,
    ) -> Self {
        self.urls = urls;
        self
    }

    pub fn with_greeter(
        mut self,
        greeter: Rc<dyn Greeter>,
    ) -> Self {
        self.greeter = greeter;
        self
    }

    pub fn with_notifier(
        mut self,
        notifier: Rc<dyn ThingStateNotifier>,
    ) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_things(
        mut self,
        things: Rc<dyn ThingRegistry>,
    ) -> Self {
        self.things = things;
        self
    }

    pub fn with_variables(
        mut self,
        variables: Rc<dyn VariableStore>,
    ) -> Self {
        self.variables = variables;
        self
    }

    /// Build a registry holding every global.
    pub fn registry(&self) -> HostFunctionRegistry {
        let mut registry = HostFunctionRegistry::new();
        self.install(&mut registry);
        registry
    }

    /// Install every global into `registry`.
    pub fn install(
        &self,
        registry: &mut HostFunctionRegistry,
    ) {
        let urls = self.urls.clone();
        registry.register(HostFunction::new("get_url", 1, move |args| {
            urls.get_url(&args[0])
        }));

        let greeter = self.greeter.clone();
        registry.register(HostFunction::new("hello", 1, move |args| {
            // non-string names get an empty greeting rather than an error
            match args[0].as_str() {
                Some(name) => greeter.hello(name),
                None => Ok(ScriptValue::from("")),
            }
        }));

        let notifier = self.notifier.clone();
        registry.register(HostFunction::new(
            "notifyOnThingStatesChange",
            2,
            move |args| {
                let name = "notifyOnThingStatesChange";
                let thing_id = arg_str(name, args, 0)?;
                let callback = arg_function(name, args, 1)?;
                notifier.notify_on_thing_states_change(thing_id, callback)
            },
        ));

        let notifier = self.notifier.clone();
        registry.register(HostFunction::new(
            "unregisterThingStateListener",
            1,
            move |args| {
                let id = listener_id("unregisterThingStateListener", args)?;
                notifier.unregister(id).map(ScriptValue::Bool)
            },
        ));

        let things = self.things.clone();
        registry.register(HostFunction::new("execThingAction", 2, move |args| {
            let name = "execThingAction";
            let thing_id = arg_str(name, args, 0)?;
            let action_id = arg_str(name, args, 1)?;
            things.exec_thing_action(thing_id, action_id, arg_or_undefined(args, 2))?;
            Ok(ScriptValue::Undefined)
        }));

        let things = self.things.clone();
        registry.register(HostFunction::new("getThingState", 2, move |args| {
            let name = "getThingState";
            let thing_id = arg_str(name, args, 0)?;
            let state_name = arg_str(name, args, 1)?;
            let instance = instance_arg(name, args, 2)?;
            things.get_thing_state(thing_id, state_name, instance)
        }));

        let things = self.things.clone();
        registry.register(HostFunction::new("getAllThingStates", 1, move |args| {
            things.get_all_thing_states(arg_str("getAllThingStates", args, 0)?)
        }));

        let things = self.things.clone();
        registry.register(HostFunction::new("cmdThingState", 4, move |args| {
            let name = "cmdThingState";
            let thing_id = arg_str(name, args, 0)?;
            let state_name = arg_str(name, args, 1)?;
            let instance = instance_arg(name, args, 2)?;
            things
                .cmd_thing_state(thing_id, state_name, instance, args[3].clone())
                .map(ScriptValue::Bool)
        }));

        let variables = self.variables.clone();
        registry.register(HostFunction::new("setGlobalVar", 2, move |args| {
            variables.set_global_var(arg_str("setGlobalVar", args, 0)?, args[1].clone());
            Ok(ScriptValue::Undefined)
        }));

        let variables = self.variables.clone();
        registry.register(HostFunction::new("getGlobalVar", 1, move |args| {
            Ok(variables.get_global_var(arg_str("getGlobalVar", args, 0)?))
        }));

        let variables = self.variables.clone();
        registry.register(HostFunction::new("getNamedInputValue", 1, move |args| {
            Ok(variables.get_named_input(arg_str("getNamedInputValue", args, 0)?))
        }));

        let variables = self.variables.clone();
        registry.register(HostFunction::new("setNamedOutputValue", 2, move |args| {
            variables.set_named_output(arg_str("setNamedOutputValue", args, 0)?, args[1].clone());
            Ok(ScriptValue::Undefined)
        }));

        let variables = self.variables.clone();
        registry.register(HostFunction::new("ruletype", 0, move |_| {
            Ok(variables.rule_type())
        }));

        debug!("installed {} host functions", registry.len());
    }
}

impl Default for HostBindings {
    fn default() -> Self {
        Self::stubs()
    }
}

impl std::fmt::Debug for HostBindings {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("HostBindings").finish_non_exhaustive()
    }
}

fn listener_id(
    name: &str,
    args: &[ScriptValue],
) -> Result<u64, HostError> {
    let raw = arg_int(name, args, 0)?;
    u64::try_from(raw).map_err(|_| HostError::TypeMismatch {
        name: name.to_string(),
        index: 0,
        expected: ValueType::Int,
        found: args[0].value_type(),
    })
}

/// State instance, defaults to 0 when the script leaves it out.
fn instance_arg(
    name: &str,
    args: &[ScriptValue],
    index: usize,
) -> Result<u16, HostError> {
    if args.get(index).map_or(true, ScriptValue::is_nullish) {
        return Ok(0);
    }
    let raw = arg_int(name, args, index)?;
    u16::try_from(raw).map_err(|_| HostError::TypeMismatch {
        name: name.to_string(),
        index,
        expected: ValueType::Int,
        found: args[index].value_type(),
    })
}

#[cfg(test)]
mod tests;
