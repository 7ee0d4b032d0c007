use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    mapper::ActuatorJointMap,
    traits::SimulationState,
};

/// Fixed proportional/derivative gains shared by every joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PdGains {
    #[serde(default = "default_kp")]
    pub kp: f64,
    #[serde(default = "default_kd")]
    pub kd: f64,
}

impl PdGains {
    pub fn new(kp: f64, kd: f64) -> Self {
        Self { kp, kd }
    }

    /// `kp * (target - q) - kd * qd`
    pub fn effort(&self, target: f64, q: f64, qd: f64) -> f64 {
        self.kp * (target - q) - self.kd * qd
    }
}

impl Default for PdGains {
    fn default() -> Self {
        Self {
            kp: default_kp(),
            kd: default_kd(),
        }
    }
}

fn default_kp() -> f64 {
    20.0
}

fn default_kd() -> f64 {
    1.0
}

/// Sinusoidal reference around the initial pose plus the gains that track it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackingParams {
    /// Swing amplitude in radians.
    pub amplitude: f64,
    /// Swing frequency in Hz.
    pub frequency: f64,
    pub gains: PdGains,
    /// Swing every other mapped actuator in opposite phase.
    pub alternate_phase: bool,
    /// Per-actuator factor applied to `amplitude`, one entry per actuator.
    /// `None` means 1.0 everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude_scales: Option<Vec<f64>>,
    /// Swing one mapped actuator at a time for this many seconds each, in
    /// actuator order, holding the others at the initial pose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_segment: Option<f64>,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 0.2,
            gains: PdGains::default(),
            alternate_phase: false,
            amplitude_scales: None,
            sweep_segment: None,
        }
    }
}

/// Copy of the position array taken right after load.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialPose(Vec<f64>);

impl InitialPose {
    pub fn capture<S>(state: &S) -> Self
    where
        S: SimulationState + ?Sized,
    {
        Self(state.positions().to_vec())
    }

    pub fn positions(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for InitialPose {
    fn from(positions: Vec<f64>) -> Self {
        Self(positions)
    }
}

/// Per-joint PD controller tracking `pose + s A sin(2π f t + φ)`.
///
/// Every call to [`compute`](Self::compute) overwrites all control slots;
/// unmapped actuators always receive `0.0`.
#[derive(Debug, Clone)]
pub struct PdTrackingController {
    map: ActuatorJointMap,
    pose: InitialPose,
    params: TrackingParams,
    /// Position of each mapped actuator among the mapped ones.
    slots: Vec<Option<usize>>,
}

impl PdTrackingController {
    pub fn new(map: ActuatorJointMap, pose: InitialPose, params: TrackingParams) -> Self {
        let mut next_slot = 0;
        let slots = map
            .entries()
            .iter()
            .map(|entry| {
                entry.map(|_| {
                    next_slot += 1;
                    next_slot - 1
                })
            })
            .collect();
        Self {
            map,
            pose,
            params,
            slots,
        }
    }

    pub fn map(&self) -> &ActuatorJointMap {
        &self.map
    }

    pub fn initial_pose(&self) -> &InitialPose {
        &self.pose
    }

    pub fn params(&self) -> &TrackingParams {
        &self.params
    }

    /// Verifies the map, the initial pose and the amplitude scales against
    /// `state` before the first tick.
    pub fn check_state<S>(&self, state: &S) -> Result<()>
    where
        S: SimulationState + ?Sized,
    {
        self.map.check_state(state)?;
        if self.pose.positions().len() != state.positions().len() {
            return Err(Error::LengthMismatch {
                expected: state.positions().len(),
                actual: self.pose.positions().len(),
            });
        }
        if let Some(scales) = &self.params.amplitude_scales {
            if scales.len() != self.map.len() {
                return Err(Error::LengthMismatch {
                    expected: self.map.len(),
                    actual: scales.len(),
                });
            }
        }
        Ok(())
    }

    /// Offset of the reference from the initial pose at time `t` (seconds).
    ///
    /// Zero for unmapped actuators and, in a sweep, for every actuator
    /// outside its segment.
    pub fn swing(&self, actuator: usize, t: f64) -> f64 {
        let Some(slot) = self.slots.get(actuator).copied().flatten() else {
            return 0.0;
        };
        let t = match self.params.sweep_segment {
            Some(segment) if segment > 0.0 => {
                let segments = (t / segment).floor();
                if segments as usize % self.map.mapped_count() != slot {
                    return 0.0;
                }
                // each segment starts from the pose
                t - segments * segment
            }
            _ => t,
        };
        let phase = if self.params.alternate_phase && slot % 2 == 1 {
            PI
        } else {
            0.0
        };
        let scale = self
            .params
            .amplitude_scales
            .as_ref()
            .and_then(|scales| scales.get(actuator))
            .copied()
            .unwrap_or(1.0);
        scale * self.params.amplitude * (2.0 * PI * self.params.frequency * t + phase).sin()
    }

    /// Position reference of the joint driven by `actuator`, or `None` if the
    /// actuator is unmapped.
    pub fn target(&self, actuator: usize, t: f64) -> Option<f64> {
        let mapped = self.map.joint_for(actuator)?;
        let pose = self.pose.positions().get(mapped.address.qpos)?;
        Some(pose + self.swing(actuator, t))
    }

    /// Writes one control value per actuator into `state`.
    ///
    /// Slots the state does not have are skipped, and an actuator whose
    /// joint lies outside the state receives `0.0`. Use
    /// [`check_state`](Self::check_state) to reject such a state up front.
    pub fn compute<S>(&self, t: f64, state: &mut S)
    where
        S: SimulationState + ?Sized,
    {
        let len = self.map.len().min(state.controls().len());
        for actuator in 0..len {
            let effort = self
                .map
                .joint_for(actuator)
                .and_then(|mapped| {
                    let q = *state.positions().get(mapped.address.qpos)?;
                    let qd = *state.velocities().get(mapped.address.dof)?;
                    let target = self.target(actuator, t)?;
                    Some(self.params.gains.effort(target, q, qd))
                })
                .unwrap_or(0.0);
            state.controls_mut()[actuator] = effort;
        }
    }
}
