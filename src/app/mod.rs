// LuckyDraw - app/mod.rs
//
// Application layer: the state container, the draw timer, and the driver
// that connects them.
// Dependencies: core layer, platform config.

pub mod draw_timer;
pub mod driver;
pub mod state;
