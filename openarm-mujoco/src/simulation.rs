use mujoco_rs::prelude::*;
use openarm_control::{Simulation, SimulationState};

/// [`Simulation`] over a MuJoCo data instance; each step is one `mj_step`.
pub struct MujocoSimulation<'m> {
    data: MjData<&'m MjModel>,
}

impl<'m> MujocoSimulation<'m> {
    pub fn new(model: &'m MjModel) -> Self {
        Self {
            data: model.make_data(),
        }
    }

    pub fn data(&self) -> &MjData<&'m MjModel> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut MjData<&'m MjModel> {
        &mut self.data
    }
}

impl std::fmt::Debug for MujocoSimulation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MujocoSimulation")
            .field("nq", &self.data.qpos().len())
            .field("nv", &self.data.qvel().len())
            .field("nu", &self.data.ctrl().len())
            .finish()
    }
}

impl SimulationState for MujocoSimulation<'_> {
    fn positions(&self) -> &[f64] {
        self.data.qpos()
    }

    fn velocities(&self) -> &[f64] {
        self.data.qvel()
    }

    fn controls(&self) -> &[f64] {
        self.data.ctrl()
    }

    fn controls_mut(&mut self) -> &mut [f64] {
        self.data.ctrl_mut()
    }
}

impl Simulation for MujocoSimulation<'_> {
    fn step(&mut self) -> Result<(), openarm_control::Error> {
        self.data.step();
        if let Some(i) = self.data.qpos().iter().position(|q| !q.is_finite()) {
            return Err(openarm_control::Error::Backend(format!(
                "mujoco: qpos[{i}] diverged"
            )));
        }
        Ok(())
    }
}
