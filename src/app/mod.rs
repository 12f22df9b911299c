//! Application layer: platform-agnostic input state and the winit runner.

pub mod input;
pub mod winit;

pub use self::winit::App;
