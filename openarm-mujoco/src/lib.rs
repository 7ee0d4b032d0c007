//! [`openarm_control`] implementation using [MuJoCo](https://mujoco.org) through
//! the `mujoco-rs` bindings.

#![warn(rust_2018_idioms)]

mod error;
mod model;
mod simulation;
#[cfg(feature = "viewer")]
mod viewer;

pub use crate::{error::*, model::*, simulation::*};
#[cfg(feature = "viewer")]
pub use crate::viewer::*;
