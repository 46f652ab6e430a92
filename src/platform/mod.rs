// LuckyDraw - platform/mod.rs
//
// Platform abstraction layer: config location/loading and import file reads.
// Dependencies: core model types, util, directories, toml.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
