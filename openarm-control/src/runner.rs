use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tracing::{debug, info};

use crate::{
    clock::{Clock, MonotonicClock},
    controller::PdTrackingController,
    error::Result,
    pacing::Pacing,
    traits::{Simulation, Viewer},
};

/// Why the control loop left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The viewer reported that the session ended.
    ViewerClosed,
    /// The interrupt flag was raised.
    Interrupted,
    /// The configured run duration elapsed.
    DurationElapsed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewerClosed => f.write_str("viewer closed"),
            Self::Interrupted => f.write_str("interrupted"),
            Self::DurationElapsed => f.write_str("duration elapsed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: Duration,
    pub reason: StopReason,
}

/// Fixed-rate loop: compute controls, step, sync, pace.
///
/// Stop conditions are polled once before every tick; a started tick always
/// runs to completion.
#[derive(Debug)]
pub struct ControlLoop<'a> {
    controller: &'a PdTrackingController,
    pacing: Pacing,
    duration: Option<Duration>,
    interrupt: Option<&'a AtomicBool>,
    status_interval: Option<Duration>,
}

impl<'a> ControlLoop<'a> {
    pub fn new(controller: &'a PdTrackingController, pacing: Pacing) -> Self {
        Self {
            controller,
            pacing,
            duration: None,
            interrupt: None,
            status_interval: None,
        }
    }

    /// Stops the loop once this much time has elapsed.
    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    /// Stops the loop once `flag` is set.
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Logs a status line at most once per `interval`. Zero disables it.
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Runs until a stop condition holds, timing from the call.
    pub fn run<S, V>(&self, sim: &mut S, viewer: &mut V) -> Result<RunSummary>
    where
        S: Simulation + ?Sized,
        V: Viewer<S> + ?Sized,
    {
        self.run_with_clock(sim, viewer, &MonotonicClock::start())
    }

    pub fn run_with_clock<S, V, C>(&self, sim: &mut S, viewer: &mut V, clock: &C) -> Result<RunSummary>
    where
        S: Simulation + ?Sized,
        V: Viewer<S> + ?Sized,
        C: Clock + ?Sized,
    {
        self.controller.check_state(&*sim)?;
        debug!(pacing = ?self.pacing, duration = ?self.duration, "control loop started");

        let mut ticks: u64 = 0;
        let mut next_status = Duration::ZERO;
        let reason = loop {
            if let LoopState::Stopped(reason) = self.poll(viewer.is_running(), clock.elapsed()) {
                break reason;
            }
            let _pace = self.pacing.begin_tick();

            let elapsed = clock.elapsed();
            let t = elapsed.as_secs_f64();
            self.controller.compute(t, sim);
            sim.step()?;
            viewer.sync(sim)?;
            ticks += 1;

            if let Some(interval) = self.status_interval {
                if elapsed >= next_status {
                    self.report(t, ticks, &*sim);
                    next_status = elapsed + interval;
                }
            }
        };

        let summary = RunSummary {
            ticks,
            elapsed: clock.elapsed(),
            reason,
        };
        info!(%reason, ticks, elapsed = ?summary.elapsed, "control loop stopped");
        Ok(summary)
    }

    /// Evaluates the stop conditions: viewer first, then interrupt, then duration.
    pub fn poll(&self, viewer_running: bool, elapsed: Duration) -> LoopState {
        if !viewer_running {
            LoopState::Stopped(StopReason::ViewerClosed)
        } else if self.interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            LoopState::Stopped(StopReason::Interrupted)
        } else if self.duration.is_some_and(|duration| elapsed >= duration) {
            LoopState::Stopped(StopReason::DurationElapsed)
        } else {
            LoopState::Running
        }
    }

    fn report<S>(&self, t: f64, ticks: u64, sim: &S)
    where
        S: Simulation + ?Sized,
    {
        match self.controller.map().first_mapped() {
            Some(mapped) => info!(
                t = format_args!("{t:.3}"),
                ticks,
                joint = mapped.joint.0,
                q = format_args!("{:.4}", sim.positions()[mapped.address.qpos]),
                "status"
            ),
            None => info!(
                t = format_args!("{t:.3}"),
                ticks, "status (no joint-driven actuator)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        ActuatorJointMap, DummyModel, DummySimulation, DummyViewer, HeadlessViewer, InitialPose,
        TrackingParams, Transmission,
    };

    /// Advances by `step` on every read.
    struct StepClock {
        now: Cell<Duration>,
        step: Duration,
    }

    impl StepClock {
        fn new(step: Duration) -> Self {
            Self {
                now: Cell::new(Duration::ZERO),
                step,
            }
        }
    }

    impl Clock for StepClock {
        fn elapsed(&self) -> Duration {
            let now = self.now.get();
            self.now.set(now + self.step);
            now
        }
    }

    fn setup() -> (DummySimulation, PdTrackingController) {
        let mut model = DummyModel::new();
        let j = model.add_hinge();
        model.add_actuator(Transmission::Joint(j));
        model.add_actuator(Transmission::Tendon);
        let sim = DummySimulation::new(&model, 0.01);
        let controller = PdTrackingController::new(
            ActuatorJointMap::from_model(&model),
            InitialPose::capture(&sim),
            TrackingParams::default(),
        );
        (sim, controller)
    }

    fn no_pacing() -> Pacing {
        Pacing::FixedDelay(Duration::ZERO)
    }

    #[test]
    fn stops_when_viewer_closes() {
        let (mut sim, controller) = setup();
        let mut viewer = DummyViewer::new(5);
        let summary = ControlLoop::new(&controller, no_pacing())
            .run(&mut sim, &mut viewer)
            .unwrap();
        assert_eq!(summary.reason, StopReason::ViewerClosed);
        assert_eq!(summary.ticks, 5);
        assert_eq!(sim.steps(), 5);
        assert_eq!(viewer.syncs(), 5);
    }

    #[test]
    fn viewer_closed_before_start_runs_no_tick() {
        let (mut sim, controller) = setup();
        let mut viewer = DummyViewer::new(0);
        let summary = ControlLoop::new(&controller, no_pacing())
            .run(&mut sim, &mut viewer)
            .unwrap();
        assert_eq!(summary.ticks, 0);
        assert_eq!(sim.steps(), 0);
    }

    #[test]
    fn stops_when_interrupted() {
        let (mut sim, controller) = setup();
        let flag = AtomicBool::new(true);
        let summary = ControlLoop::new(&controller, no_pacing())
            .with_interrupt(&flag)
            .run(&mut sim, &mut HeadlessViewer)
            .unwrap();
        assert_eq!(summary.reason, StopReason::Interrupted);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn stops_when_duration_elapses() {
        let (mut sim, controller) = setup();
        // Two clock reads per tick: the poll and the controller time.
        let clock = StepClock::new(Duration::from_millis(100));
        let summary = ControlLoop::new(&controller, no_pacing())
            .with_duration(Some(Duration::from_secs(1)))
            .run_with_clock(&mut sim, &mut HeadlessViewer, &clock)
            .unwrap();
        assert_eq!(summary.reason, StopReason::DurationElapsed);
        assert_eq!(summary.ticks, 5);
    }

    #[test]
    fn viewer_takes_priority_over_interrupt() {
        let (_, controller) = setup();
        let flag = AtomicBool::new(true);
        let control_loop = ControlLoop::new(&controller, no_pacing())
            .with_interrupt(&flag)
            .with_duration(Some(Duration::ZERO));
        assert_eq!(
            control_loop.poll(false, Duration::ZERO),
            LoopState::Stopped(StopReason::ViewerClosed)
        );
        assert_eq!(
            control_loop.poll(true, Duration::ZERO),
            LoopState::Stopped(StopReason::Interrupted)
        );
        flag.store(false, Ordering::Relaxed);
        assert_eq!(
            control_loop.poll(true, Duration::ZERO),
            LoopState::Stopped(StopReason::DurationElapsed)
        );
        assert_eq!(
            ControlLoop::new(&controller, no_pacing()).poll(true, Duration::from_secs(1000)),
            LoopState::Running
        );
    }

    #[test]
    fn viewer_sees_controls_of_the_tick() {
        let (mut sim, controller) = setup();
        let mut viewer = DummyViewer::new(1);
        // Quarter period of the default 0.2 Hz swing.
        let clock = StepClock::new(Duration::from_millis(1250));
        ControlLoop::new(&controller, no_pacing())
            .run_with_clock(&mut sim, &mut viewer, &clock)
            .unwrap();
        let controls = viewer.last_controls();
        assert!((controls[0] - 2.0).abs() < 1e-9, "{controls:?}");
        assert_eq!(controls[1], 0.0);
    }

    #[test]
    fn status_report_does_not_disturb_the_loop() {
        let (mut sim, controller) = setup();
        let mut viewer = DummyViewer::new(10);
        let summary = ControlLoop::new(&controller, no_pacing())
            .with_status_interval(Duration::from_millis(1))
            .run(&mut sim, &mut viewer)
            .unwrap();
        assert_eq!(summary.ticks, 10);
    }

    #[test]
    fn mismatched_state_fails_before_first_tick() {
        let (_, controller) = setup();
        let mut model = DummyModel::new();
        model.add_actuator(Transmission::Tendon);
        let mut other = DummySimulation::new(&model, 0.01);
        let mut viewer = DummyViewer::new(3);
        assert!(ControlLoop::new(&controller, no_pacing())
            .run(&mut other, &mut viewer)
            .is_err());
        assert_eq!(viewer.syncs(), 0);
    }

    #[test]
    fn stop_reason_display() {
        assert_eq!(StopReason::ViewerClosed.to_string(), "viewer closed");
        assert_eq!(StopReason::Interrupted.to_string(), "interrupted");
        assert_eq!(StopReason::DurationElapsed.to_string(), "duration elapsed");
    }

    #[test]
    fn step_error_stops_the_loop() {
        let (mut sim, _) = setup();
        let mut model = DummyModel::new();
        let j = model.add_hinge();
        model.add_actuator(Transmission::Joint(j));
        model.add_actuator(Transmission::Tendon);
        let controller = PdTrackingController::new(
            ActuatorJointMap::from_model(&model),
            InitialPose::capture(&sim),
            TrackingParams {
                gains: crate::PdGains::new(f64::INFINITY, 0.0),
                ..Default::default()
            },
        );
        let mut viewer = DummyViewer::new(10);
        let clock = StepClock::new(Duration::from_millis(1250));
        let err = ControlLoop::new(&controller, no_pacing())
            .run_with_clock(&mut sim, &mut viewer, &clock)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Backend(_)));
        assert_eq!(viewer.syncs(), 0);
    }
}
