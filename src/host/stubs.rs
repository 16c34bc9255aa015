//! In-memory doubles for every host port.
//!
//! The real host wires these ports to the device bus. The doubles answer
//! deterministically and remember what they were asked, which is all a
//! script run or a test needs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use super::{Greeter, ThingRegistry, ThingStateNotifier, UrlFetcher, VariableStore};
use crate::runtime::value::{ScriptFunction, ScriptValue};
use crate::runtime::HostError;

/// Answers `get_url <target>` without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoUrlFetcher;

impl UrlFetcher for EchoUrlFetcher {
    fn get_url(
        &self,
        target: &ScriptValue,
    ) -> Result<ScriptValue, HostError> {
        Ok(ScriptValue::from(format!("get_url {}", target)))
    }
}

/// Always fails.
#[derive(Debug, Clone)]
pub struct FailingUrlFetcher {
    pub message: String,
}

impl FailingUrlFetcher {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl UrlFetcher for FailingUrlFetcher {
    fn get_url(
        &self,
        _target: &ScriptValue,
    ) -> Result<ScriptValue, HostError> {
        Err(HostError::collaborator("get_url", self.message.clone()))
    }
}

/// Greets with a fixed word and records every name it greeted.
#[derive(Debug)]
pub struct RecordingGreeter {
    greeting: String,
    greeted: RefCell<Vec<String>>,
}

impl RecordingGreeter {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
            greeted: RefCell::new(Vec::new()),
        }
    }

    /// Names greeted so far, oldest first
    pub fn greeted(&self) -> Vec<String> {
        self.greeted.borrow().clone()
    }
}

impl Default for RecordingGreeter {
    fn default() -> Self {
        Self::new("hello")
    }
}

impl Greeter for RecordingGreeter {
    fn hello(
        &self,
        name: &str,
    ) -> Result<ScriptValue, HostError> {
        self.greeted.borrow_mut().push(name.to_string());
        Ok(ScriptValue::from(format!("{} {}", self.greeting, name)))
    }
}

#[derive(Debug)]
struct Listener {
    thing_id: String,
    callback: ScriptFunction,
}

/// Keeps subscriptions in memory; [`MemoryNotifier::publish`] plays the
/// part of the device bus.
#[derive(Debug)]
pub struct MemoryNotifier {
    next_id: Cell<u64>,
    listeners: RefCell<IndexMap<u64, Listener>>,
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self {
            next_id: Cell::new(1),
            listeners: RefCell::new(IndexMap::new()),
        }
    }
}

impl MemoryNotifier {
    /// Ids of live subscriptions for `thing_id`, oldest first
    pub fn listener_ids(
        &self,
        thing_id: &str,
    ) -> Vec<u64> {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, listener)| listener.thing_id == thing_id)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Deliver a state change to every subscriber of `thing_id`. Callbacks get
    /// `(thing_id, state)`. Returns how many were called.
    pub fn publish(
        &self,
        thing_id: &str,
        state: ScriptValue,
    ) -> usize {
        // callbacks may subscribe or unsubscribe, don't hold the borrow
        let callbacks: Vec<ScriptFunction> = self
            .listeners
            .borrow()
            .values()
            .filter(|listener| listener.thing_id == thing_id)
            .map(|listener| listener.callback.clone())
            .collect();
        let args = [ScriptValue::from(thing_id), state];
        for callback in &callbacks {
            callback.call(&args);
        }
        callbacks.len()
    }
}

impl ThingStateNotifier for MemoryNotifier {
    fn notify_on_thing_states_change(
        &self,
        thing_id: &str,
        callback: ScriptFunction,
    ) -> Result<ScriptValue, HostError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(
            id,
            Listener {
                thing_id: thing_id.to_string(),
                callback,
            },
        );
        debug!("listener {} registered for {}", id, thing_id);
        // flag: callback is raw compiled code; a ScriptFunction is a function object
        Ok(ScriptValue::from(format!(
            "notifyOnThingStatesChange {} false",
            thing_id
        )))
    }

    fn unregister(
        &self,
        listener_id: u64,
    ) -> Result<bool, HostError> {
        Ok(self.listeners.borrow_mut().shift_remove(&listener_id).is_some())
    }
}

type StateKey = (String, u16);

/// Things and their states, in memory.
#[derive(Debug, Default)]
pub struct MemoryThings {
    things: RefCell<IndexMap<String, IndexMap<StateKey, ScriptValue>>>,
    actions: RefCell<Vec<(String, String, ScriptValue)>>,
}

impl MemoryThings {
    /// Make `thing_id` known, with no states.
    pub fn add_thing(
        &self,
        thing_id: &str,
    ) {
        self.things
            .borrow_mut()
            .entry(thing_id.to_string())
            .or_default();
    }

    /// Set a state directly, adding the thing if needed.
    pub fn set_state(
        &self,
        thing_id: &str,
        state_name: &str,
        instance: u16,
        value: ScriptValue,
    ) {
        self.things
            .borrow_mut()
            .entry(thing_id.to_string())
            .or_default()
            .insert((state_name.to_string(), instance), value);
    }

    /// Actions executed so far as `(thing, action, arguments)`
    pub fn actions(&self) -> Vec<(String, String, ScriptValue)> {
        self.actions.borrow().clone()
    }
}

impl ThingRegistry for MemoryThings {
    fn exec_thing_action(
        &self,
        thing_id: &str,
        action_id: &str,
        arguments: ScriptValue,
    ) -> Result<(), HostError> {
        if !self.things.borrow().contains_key(thing_id) {
            return Err(HostError::UnknownThing(thing_id.to_string()));
        }
        self.actions
            .borrow_mut()
            .push((thing_id.to_string(), action_id.to_string(), arguments));
        Ok(())
    }

    fn get_thing_state(
        &self,
        thing_id: &str,
        state_name: &str,
        instance: u16,
    ) -> Result<ScriptValue, HostError> {
        let things = self.things.borrow();
        let states = things
            .get(thing_id)
            .ok_or_else(|| HostError::UnknownThing(thing_id.to_string()))?;
        Ok(states
            .get(&(state_name.to_string(), instance))
            .cloned()
            .unwrap_or_default())
    }

    fn get_all_thing_states(
        &self,
        thing_id: &str,
    ) -> Result<ScriptValue, HostError> {
        let things = self.things.borrow();
        let states = things
            .get(thing_id)
            .ok_or_else(|| HostError::UnknownThing(thing_id.to_string()))?;
        Ok(ScriptValue::List(
            states
                .iter()
                .map(|((name, instance), value)| {
                    ScriptValue::List(vec![
                        ScriptValue::from(name.as_str()),
                        ScriptValue::Int(i64::from(*instance)),
                        value.clone(),
                    ])
                })
                .collect(),
        ))
    }

    fn cmd_thing_state(
        &self,
        thing_id: &str,
        state_name: &str,
        instance: u16,
        value: ScriptValue,
    ) -> Result<bool, HostError> {
        let mut things = self.things.borrow_mut();
        match things.get_mut(thing_id) {
            Some(states) => {
                states.insert((state_name.to_string(), instance), value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Global variables, named inputs and named outputs, in memory.
#[derive(Debug)]
pub struct MemoryVariables {
    globals: RefCell<HashMap<String, ScriptValue>>,
    inputs: RefCell<HashMap<String, ScriptValue>>,
    outputs: RefCell<IndexMap<String, ScriptValue>>,
    rule_type: String,
}

impl Default for MemoryVariables {
    fn default() -> Self {
        Self::new("condition")
    }
}

impl MemoryVariables {
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            globals: RefCell::new(HashMap::new()),
            inputs: RefCell::new(HashMap::new()),
            outputs: RefCell::new(IndexMap::new()),
            rule_type: rule_type.into(),
        }
    }

    /// Provide a named input for the script
    pub fn set_input(
        &self,
        name: &str,
        value: ScriptValue,
    ) {
        self.inputs.borrow_mut().insert(name.to_string(), value);
    }

    /// Read back a named output, `undefined` when never set
    pub fn output(
        &self,
        name: &str,
    ) -> ScriptValue {
        self.outputs
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

impl VariableStore for MemoryVariables {
    fn set_global_var(
        &self,
        name: &str,
        value: ScriptValue,
    ) {
        self.globals.borrow_mut().insert(name.to_string(), value);
    }

    fn get_global_var(
        &self,
        name: &str,
    ) -> ScriptValue {
        self.globals
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn get_named_input(
        &self,
        name: &str,
    ) -> ScriptValue {
        self.inputs.borrow().get(name).cloned().unwrap_or_default()
    }

    fn set_named_output(
        &self,
        name: &str,
        value: ScriptValue,
    ) {
        self.outputs.borrow_mut().insert(name.to_string(), value);
    }

    fn rule_type(&self) -> ScriptValue {
        ScriptValue::from(self.rule_type.as_str())
    }
}
