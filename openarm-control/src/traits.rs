use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Index of a joint in the loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId(pub usize);

/// Offsets of a joint's scalars inside the flat state arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointAddress {
    /// Start address in the position array.
    pub qpos: usize,
    /// Start address in the velocity array.
    pub dof: usize,
}

/// How an actuator's signal couples into the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Joint(JointId),
    JointInParent(JointId),
    SliderCrank,
    Tendon,
    Site,
    Body,
    Other(i32),
}

impl Transmission {
    /// Returns the driven joint if this is a plain joint transmission.
    ///
    /// `JointInParent` does not count as a joint drive.
    pub fn joint(&self) -> Option<JointId> {
        match self {
            Self::Joint(id) => Some(*id),
            _ => None,
        }
    }
}

/// Static topology of a loaded model.
#[auto_impl(&, Box, Arc)]
pub trait Model {
    /// Returns the number of actuators.
    fn actuator_count(&self) -> usize;

    /// Returns the transmission of the actuator at `actuator`.
    ///
    /// `actuator` must be less than [`actuator_count`](Self::actuator_count).
    fn transmission(&self, actuator: usize) -> Transmission;

    /// Returns where the joint's position and velocity live in the state arrays.
    fn joint_address(&self, joint: JointId) -> JointAddress;
}

/// Flat, offset-addressed simulation state.
#[auto_impl(&mut, Box)]
pub trait SimulationState {
    /// One slot per position coordinate.
    fn positions(&self) -> &[f64];

    /// One slot per degree of freedom.
    fn velocities(&self) -> &[f64];

    /// One slot per actuator.
    fn controls(&self) -> &[f64];

    fn controls_mut(&mut self) -> &mut [f64];
}

/// Physics driver that advances the state by one timestep.
#[auto_impl(&mut, Box)]
pub trait Simulation: SimulationState {
    fn step(&mut self) -> Result<(), Error>;
}

/// Visualizer of a simulation state.
///
/// The session is alive while [`is_running`](Self::is_running) returns true;
/// there is no callback when it ends.
#[auto_impl(&mut, Box)]
pub trait Viewer<S: ?Sized> {
    fn is_running(&self) -> bool;

    fn sync(&mut self, state: &mut S) -> Result<(), Error>;
}
