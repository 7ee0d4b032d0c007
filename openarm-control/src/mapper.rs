use tracing::debug;

use crate::{
    error::{Error, Result},
    traits::{JointAddress, JointId, Model, SimulationState},
};

/// A joint driven by an actuator, with its resolved state offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedJoint {
    pub joint: JointId,
    pub address: JointAddress,
}

/// Lookup table from actuator index to the joint it drives.
///
/// Built once from the model topology and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorJointMap {
    entries: Vec<Option<MappedJoint>>,
}

impl ActuatorJointMap {
    /// Walks the actuators in index order and records the joint each one
    /// drives. Actuators without a joint transmission are left unmapped.
    pub fn from_model<M>(model: &M) -> Self
    where
        M: Model + ?Sized,
    {
        let entries: Vec<_> = (0..model.actuator_count())
            .map(|actuator| {
                model.transmission(actuator).joint().map(|joint| MappedJoint {
                    joint,
                    address: model.joint_address(joint),
                })
            })
            .collect();
        let map = Self { entries };
        debug!(
            actuators = map.len(),
            mapped = map.mapped_count(),
            "mapped actuators to joints"
        );
        map
    }

    /// Returns the number of actuators, mapped or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the joint driven by `actuator`, or `None` if it is unmapped or
    /// out of range.
    pub fn joint_for(&self, actuator: usize) -> Option<MappedJoint> {
        self.entries.get(actuator).copied().flatten()
    }

    pub fn entries(&self) -> &[Option<MappedJoint>] {
        &self.entries
    }

    pub fn mapped_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn first_mapped(&self) -> Option<MappedJoint> {
        self.entries.iter().flatten().next().copied()
    }

    /// Checks that the state has one control slot per actuator and that every
    /// mapped address lies inside the state arrays.
    pub fn check_state<S>(&self, state: &S) -> Result<()>
    where
        S: SimulationState + ?Sized,
    {
        if state.controls().len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: state.controls().len(),
            });
        }
        for mapped in self.entries.iter().flatten() {
            let JointAddress { qpos, dof } = mapped.address;
            if qpos >= state.positions().len() {
                return Err(Error::AddressOutOfRange {
                    what: "position",
                    index: qpos,
                    len: state.positions().len(),
                });
            }
            if dof >= state.velocities().len() {
                return Err(Error::AddressOutOfRange {
                    what: "velocity",
                    index: dof,
                    len: state.velocities().len(),
                });
            }
        }
        Ok(())
    }
}

impl<M> From<&M> for ActuatorJointMap
where
    M: Model,
{
    fn from(model: &M) -> Self {
        Self::from_model(model)
    }
}
