use mujoco_rs::{prelude::*, viewer::MjViewer};
use openarm_control::Viewer;
use tracing::debug;

use crate::{Error, MujocoSimulation};

/// Passive MuJoCo viewer: the control loop owns stepping, the viewer only
/// renders on [`sync`](Viewer::sync).
pub struct MujocoViewer<'m> {
    viewer: MjViewer<&'m MjModel>,
}

impl<'m> MujocoViewer<'m> {
    /// Opens the viewer window.
    pub fn launch(model: &'m MjModel) -> Result<Self, Error> {
        let viewer =
            MjViewer::launch_passive(model, 0).map_err(|e| Error::Viewer(format!("{e:?}")))?;
        debug!("launched passive viewer");
        Ok(Self { viewer })
    }
}

impl std::fmt::Debug for MujocoViewer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MujocoViewer")
            .field("running", &self.viewer.running())
            .finish()
    }
}

impl<'m> Viewer<MujocoSimulation<'m>> for MujocoViewer<'m> {
    fn is_running(&self) -> bool {
        self.viewer.running()
    }

    fn sync(&mut self, state: &mut MujocoSimulation<'m>) -> Result<(), openarm_control::Error> {
        self.viewer.sync(state.data_mut());
        Ok(())
    }
}
