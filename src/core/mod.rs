// LogTab - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app or platform.

pub mod export;
pub mod model;
pub mod parser;
pub mod summary;
pub mod table;
