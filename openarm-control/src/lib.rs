//! Actuator-to-joint mapping, PD tracking control and a rate-limited control
//! loop over an external physics simulator.
//!
//! The simulator, its model loader and its viewer are consumed through the
//! [`Model`], [`Simulation`] and [`Viewer`] traits; nothing in this crate
//! integrates dynamics.

#![warn(rust_2018_idioms)]

mod clock;
mod controller;
mod dummy;
mod error;
mod headless;
mod mapper;
mod pacing;
mod runner;
mod traced;
mod traits;

pub use clock::*;
pub use controller::*;
pub use dummy::*;
pub use error::*;
pub use headless::*;
pub use mapper::*;
pub use pacing::*;
pub use runner::*;
pub use traced::*;
pub use traits::*;
