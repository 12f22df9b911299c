//! Utility Module
//!
//! - [`OrbitControls`]: camera orbit controller driven by pointer input
//! - [`Spring`]: frame-rate independent damped spring
//! - [`Timer`]: frame timing
//! - [`color`]: `#rrggbb` parsing and sRGB to linear conversion

pub mod color;
pub mod orbit_control;
pub mod spring;
pub mod time;

pub use orbit_control::OrbitControls;
pub use spring::{Spring, SpringConfig};
pub use time::Timer;
