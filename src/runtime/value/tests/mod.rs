//! Tests for script values

mod display;
