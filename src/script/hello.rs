//! The hello script
//!
//! Smoke test for a host: reads an import, calls three host globals, logs
//! what they return, schedules a delayed write of the output slot and
//! writes the slot synchronously right away. Run to completion the slot
//! ends up holding `"timeout"`; read before the timer fires it holds `"abc"`.

use tracing::debug;

use crate::runtime::scheduler::Deferred;
use crate::runtime::value::{ScriptFunction, ScriptValue};
use crate::runtime::HostError;

use super::ScriptContext;

/// Import the script reads from its collaborator module.
pub const IMPORT_NAME: &str = "a_string";

/// Delay before the output slot is overwritten, unless configured.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// What the synchronous part of the script leaves behind.
#[derive(Debug)]
pub struct ScriptOutcome {
    /// Resolves once the delayed continuation has written the output slot
    pub timeout: Deferred<()>,
    /// Handle returned by the state-change subscription
    pub subscription: ScriptValue,
}

/// Run the synchronous body. Must be called inside the event loop.
///
/// Any host global failing ends the script right there; nothing after the
/// failing call runs and no timer is scheduled.
pub fn run(
    ctx: &ScriptContext,
    delay_ms: u64,
) -> Result<ScriptOutcome, HostError> {
    let abc = ctx.import(IMPORT_NAME);

    let r = ctx.call("get_url", &[ScriptValue::Int(17)])?;
    ctx.log(&[ScriptValue::from("get_url: "), r]);

    let r2 = ctx.call("hello", &[ScriptValue::from("friend")])?;
    ctx.log(&[r2]);

    let console = ctx.console();
    let on_change = ScriptFunction::new("on_thing_change", move |_| {
        console.log(&[ScriptValue::from("thing_id")]);
        ScriptValue::Undefined
    });
    let r3 = ctx.call(
        "notifyOnThingStatesChange",
        &[ScriptValue::from("thing_id"), on_change.into()],
    )?;
    ctx.log(&[ScriptValue::from("notifyOnThingStatesChange"), r3.clone()]);

    let output = ctx.output().clone();
    let console = ctx.console();
    let fired = ctx.scheduler().delay(delay_ms, ScriptValue::Undefined);
    let timeout = ctx.scheduler().then(&fired, move |_| {
        output.set(ScriptValue::from("timeout"));
        console.log(&[output.get()]);
    });
    debug!("output write scheduled in {}ms", delay_ms);

    ctx.output().set(ScriptValue::from("abc"));
    ctx.log(&[ScriptValue::from("Hello World"), abc]);

    Ok(ScriptOutcome {
        timeout,
        subscription: r3,
    })
}
