// LuckyDraw - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library plus chrono, rand, serde, csv.
// Must NOT depend on: app, platform, or the filesystem.

pub mod dedup;
pub mod draw;
pub mod export;
pub mod history;
pub mod import;
pub mod model;
pub mod registry;
