//! Dynamic values exchanged between scripts and the host
//!
//! Host functions take and return [`ScriptValue`]s, the console renders them
//! and the output slot stores one.

pub mod script_value;
pub use script_value::*;

#[cfg(test)]
mod tests;
