// LogTab - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories crate.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
