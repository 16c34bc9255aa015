//! Host binding tests

mod stubs;
