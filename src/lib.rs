//! OHX script host
//!
//! Runs rule scripts on a single-threaded cooperative event loop with
//! millisecond timers, single-assignment deferred values and a set of host
//! capabilities injected through port traits.
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use ohx_script::script::StdoutConsole;
//! use ohx_script::util::config::HostConfig;
//! use ohx_script::{bindings_from_config, run_hello, Result};
//!
//! fn main() -> Result<()> {
//!     let config = HostConfig::default();
//!     let report = run_hello(&config, &bindings_from_config(&config), Rc::new(StdoutConsole))?;
//!     println!("{}", report.describe());
//!     Ok(())
//! }
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod host;
pub mod runtime;
pub mod script;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};

use std::rc::Rc;

use tracing::debug;

use crate::host::stubs::{MemoryVariables, RecordingGreeter};
use crate::host::HostBindings;
use crate::runtime::scheduler::{EventLoop, SchedulerStats};
use crate::runtime::value::ScriptValue;
use crate::script::{hello, Console, ModuleImports, OutputSlot, ScriptContext};
use crate::util::config::HostConfig;

/// Host version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Host name
pub const NAME: &str = "OHX script host";

/// Result of a finished script run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptReport {
    /// Output slot once the loop went idle
    pub output: ScriptValue,
    /// Timer activity during the run
    pub stats: SchedulerStats,
}

impl ScriptReport {
    /// `b<is bool>,f<is float>,i<is int>,s<is string>,<value>`
    pub fn describe(&self) -> String {
        script::describe_value(&self.output)
    }
}

/// In-memory host doubles configured from `config.host`.
pub fn bindings_from_config(config: &HostConfig) -> HostBindings {
    HostBindings::stubs()
        .with_greeter(Rc::new(RecordingGreeter::new(config.host.greeting.as_str())))
        .with_variables(Rc::new(MemoryVariables::new(config.host.rule_type.as_str())))
}

/// Run the hello script to completion
///
/// The script body runs first; then the loop keeps turning until its
/// delayed write has happened. A failing host global aborts the run and
/// nothing it scheduled is executed.
pub fn run_hello(
    config: &HostConfig,
    bindings: &HostBindings,
    console: Rc<dyn Console>,
) -> Result<ScriptReport> {
    let event_loop = EventLoop::new().context("Failed to start event loop")?;
    let scheduler = event_loop.scheduler();

    let imports = ModuleImports::new().with(hello::IMPORT_NAME, config.script.a_string.as_str());
    let ctx = ScriptContext::new(scheduler.clone(), bindings.registry(), console)
        .with_imports(imports)
        .with_output(OutputSlot::new(config.script.initial_output()));

    debug!("running hello script, delay {}ms", config.script.delay_ms);
    event_loop
        .try_run(async { hello::run(&ctx, config.script.delay_ms) })
        .context("Hello script failed")?;

    let report = ScriptReport {
        output: ctx.output().get(),
        stats: scheduler.stats(),
    };
    debug!("run finished: {:?}", report.stats);
    Ok(report)
}
