//! Runtime system
//!
//! Script values, the host function table and the cooperative scheduler.

pub mod error;
pub mod hostfunc;
pub mod scheduler;
pub mod value;

pub use error::HostError;
