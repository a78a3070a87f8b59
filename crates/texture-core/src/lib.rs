//! USDA soil texture triangle: composition geometry, classification, region
//! table and the interactive composition controller.
//!
//! Everything here is synchronous and free of I/O. A rendering surface (the
//! wasm bridge, the PNG visualizer) feeds raw input events into a
//! [`controller::Controller`] and draws the [`scene::Scene`] it produces.

pub mod classifier;
pub mod composition;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod regions;
pub mod scene;
pub mod solver;

pub use classifier::{classify, TextureClass};
pub use composition::{Axis, Composition, LockState};
pub use config::DiagramConfig;
pub use controller::{apply, Controller, DiagramState, Event};
pub use error::TextureError;
pub use geometry::{forward, inverse, ScreenPoint, Triangle};
pub use scene::Scene;
