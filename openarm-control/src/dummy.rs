use crate::{
    error::{Error, Result},
    traits::{JointAddress, JointId, Model, Simulation, SimulationState, Transmission, Viewer},
};

const FREE_JOINT_NQ: usize = 7;
const FREE_JOINT_NV: usize = 6;

/// Dummy Model for Debug or Tests
#[derive(Debug, Clone, Default)]
pub struct DummyModel {
    joints: Vec<JointAddress>,
    hinges: Vec<JointId>,
    actuators: Vec<Transmission>,
    nq: usize,
    nv: usize,
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single-scalar joint.
    pub fn add_hinge(&mut self) -> JointId {
        let id = self.push_joint(1, 1);
        self.hinges.push(id);
        id
    }

    /// Appends a floating base joint (position + quaternion, 6 dofs).
    pub fn add_free_joint(&mut self) -> JointId {
        self.push_joint(FREE_JOINT_NQ, FREE_JOINT_NV)
    }

    /// Appends an actuator and returns its index.
    pub fn add_actuator(&mut self, transmission: Transmission) -> usize {
        self.actuators.push(transmission);
        self.actuators.len() - 1
    }

    pub fn nq(&self) -> usize {
        self.nq
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    fn push_joint(&mut self, nq: usize, nv: usize) -> JointId {
        self.joints.push(JointAddress {
            qpos: self.nq,
            dof: self.nv,
        });
        self.nq += nq;
        self.nv += nv;
        JointId(self.joints.len() - 1)
    }
}

impl Model for DummyModel {
    fn actuator_count(&self) -> usize {
        self.actuators.len()
    }

    fn transmission(&self, actuator: usize) -> Transmission {
        self.actuators[actuator]
    }

    fn joint_address(&self, joint: JointId) -> JointAddress {
        self.joints[joint.0]
    }
}

/// Dummy Simulation for Debug or Tests
///
/// Each step applies the control of every joint-driven actuator as a force on
/// a unit-inertia hinge and integrates with semi-implicit Euler. Free joints
/// never move. This only exists to close the loop in tests.
#[derive(Debug, Clone)]
pub struct DummySimulation {
    qpos: Vec<f64>,
    qvel: Vec<f64>,
    ctrl: Vec<f64>,
    drives: Vec<Option<usize>>,
    hinges: Vec<JointAddress>,
    timestep: f64,
    steps: u64,
}

impl DummySimulation {
    pub fn new(model: &DummyModel, timestep: f64) -> Self {
        let hinges: Vec<_> = model
            .hinges
            .iter()
            .map(|&id| model.joint_address(id))
            .collect();
        let drives = model
            .actuators
            .iter()
            .map(|trn| {
                trn.joint()
                    .filter(|id| model.hinges.contains(id))
                    .map(|id| model.joint_address(id).dof)
            })
            .collect();
        Self {
            qpos: vec![0.0; model.nq],
            qvel: vec![0.0; model.nv],
            ctrl: vec![0.0; model.actuators.len()],
            drives,
            hinges,
            timestep,
            steps: 0,
        }
    }

    pub fn positions_mut(&mut self) -> &mut [f64] {
        &mut self.qpos
    }

    pub fn velocities_mut(&mut self) -> &mut [f64] {
        &mut self.qvel
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl SimulationState for DummySimulation {
    fn positions(&self) -> &[f64] {
        &self.qpos
    }

    fn velocities(&self) -> &[f64] {
        &self.qvel
    }

    fn controls(&self) -> &[f64] {
        &self.ctrl
    }

    fn controls_mut(&mut self) -> &mut [f64] {
        &mut self.ctrl
    }
}

impl Simulation for DummySimulation {
    fn step(&mut self) -> Result<()> {
        for (force, dof) in self.ctrl.iter().zip(&self.drives) {
            if let Some(dof) = dof {
                self.qvel[*dof] += force * self.timestep;
            }
        }
        for hinge in &self.hinges {
            self.qpos[hinge.qpos] += self.qvel[hinge.dof] * self.timestep;
        }
        self.steps += 1;
        if let Some(i) = self.qpos.iter().position(|q| !q.is_finite()) {
            return Err(Error::Backend(format!(
                "qpos[{i}] diverged at step {}",
                self.steps
            )));
        }
        Ok(())
    }
}

/// Dummy Viewer for Debug or Tests
///
/// Reports running until it has been synced `max_syncs` times.
#[derive(Debug, Clone)]
pub struct DummyViewer {
    max_syncs: usize,
    syncs: usize,
    last_controls: Vec<f64>,
}

impl DummyViewer {
    pub fn new(max_syncs: usize) -> Self {
        Self {
            max_syncs,
            syncs: 0,
            last_controls: Vec::new(),
        }
    }

    pub fn syncs(&self) -> usize {
        self.syncs
    }

    /// Controls of the state seen by the latest sync.
    pub fn last_controls(&self) -> &[f64] {
        &self.last_controls
    }
}

impl<S> Viewer<S> for DummyViewer
where
    S: SimulationState + ?Sized,
{
    fn is_running(&self) -> bool {
        self.syncs < self.max_syncs
    }

    fn sync(&mut self, state: &mut S) -> Result<()> {
        self.syncs += 1;
        self.last_controls.clear();
        self.last_controls.extend_from_slice(state.controls());
        Ok(())
    }
}
