use std::{path::Path, sync::atomic::AtomicBool};

use openarm_control::{
    ActuatorJointMap, ControlLoop, InitialPose, Model, PdTrackingController, RunSummary,
    SimulationState,
};

use crate::{Error, TrackingConfig};

/// Builds the controller from the model topology and the state right after load.
pub fn build_controller<M, S>(config: &TrackingConfig, model: &M, state: &S) -> PdTrackingController
where
    M: Model + ?Sized,
    S: SimulationState + ?Sized,
{
    PdTrackingController::new(
        ActuatorJointMap::from_model(model),
        InitialPose::capture(state),
        config.tracking_params(),
    )
}

pub fn build_loop<'a>(
    config: &TrackingConfig,
    controller: &'a PdTrackingController,
    interrupt: &'a AtomicBool,
) -> ControlLoop<'a> {
    ControlLoop::new(controller, config.pacing())
        .with_interrupt(interrupt)
        .with_duration(config.run_duration())
        .with_status_interval(config.status_interval())
}

/// Loads `description` into MuJoCo and tracks the sinusoid until the viewer
/// closes, `interrupt` is raised, or the configured duration elapses.
#[cfg(feature = "mujoco")]
pub fn run_tracking(
    config: &TrackingConfig,
    description: &Path,
    interrupt: &AtomicBool,
) -> Result<RunSummary, Error> {
    use openarm_control::{HeadlessViewer, Tracing};
    use openarm_mujoco::{load_model, MujocoModel, MujocoSimulation, MujocoViewer};

    let raw = load_model(description)?;
    let model = MujocoModel::new(&raw);
    let mut sim = Tracing::new(MujocoSimulation::new(&raw));
    let controller = build_controller(config, &model, &sim);
    let control_loop = build_loop(config, &controller, interrupt);

    let summary = if config.headless {
        control_loop.run(&mut sim, &mut Tracing::new(HeadlessViewer))?
    } else {
        let mut viewer = Tracing::new(MujocoViewer::launch(&raw)?);
        control_loop.run(&mut sim, &mut viewer)?
    };
    Ok(summary)
}

#[cfg(not(feature = "mujoco"))]
pub fn run_tracking(
    _config: &TrackingConfig,
    _description: &Path,
    _interrupt: &AtomicBool,
) -> Result<RunSummary, Error> {
    Err(Error::BackendUnavailable("mujoco"))
}
