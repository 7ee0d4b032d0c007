use crate::{error::Result, traits::Viewer};

/// Viewer that never closes and renders nothing.
///
/// Runs using it end on an interrupt or a run duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessViewer;

impl<S: ?Sized> Viewer<S> for HeadlessViewer {
    fn is_running(&self) -> bool {
        true
    }

    fn sync(&mut self, _state: &mut S) -> Result<()> {
        Ok(())
    }
}
