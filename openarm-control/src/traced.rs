use tracing::trace;

use crate::{
    error::Result,
    traits::{Simulation, SimulationState, Viewer},
};

/// Wrapper that emits a `trace!` event for every call into the wrapped
/// simulator or viewer.
///
/// A wrapped viewer syncs a wrapped simulation: `Tracing<V>` implements
/// `Viewer<Tracing<S>>` whenever `V: Viewer<S>`.
#[derive(Debug, Clone, Default)]
pub struct Tracing<T>(T);

impl<T> Tracing<T> {
    pub fn new(v: T) -> Self {
        Self(v)
    }

    pub fn get_ref(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Tracing<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: SimulationState> SimulationState for Tracing<T> {
    fn positions(&self) -> &[f64] {
        self.0.positions()
    }

    fn velocities(&self) -> &[f64] {
        self.0.velocities()
    }

    fn controls(&self) -> &[f64] {
        self.0.controls()
    }

    fn controls_mut(&mut self) -> &mut [f64] {
        self.0.controls_mut()
    }
}

impl<T: Simulation> Simulation for Tracing<T> {
    fn step(&mut self) -> Result<()> {
        let controls = self.0.controls();
        trace!(method = "Simulation::step", ?controls);
        let result = self.0.step();
        if let Err(e) = &result {
            trace!(method = "Simulation::step", error = %e);
        }
        result
    }
}

impl<S, T> Viewer<Tracing<S>> for Tracing<T>
where
    T: Viewer<S>,
{
    fn is_running(&self) -> bool {
        let running = self.0.is_running();
        trace!(method = "Viewer::is_running", running);
        running
    }

    fn sync(&mut self, state: &mut Tracing<S>) -> Result<()> {
        trace!(method = "Viewer::sync");
        self.0.sync(&mut state.0)
    }
}
