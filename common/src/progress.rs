use std::ops::ControlFlow;

/// Receives scan progress as a percentage in `0..=100`.
///
/// Returning [`ControlFlow::Break`] asks the scan to stop; it then returns
/// whatever it gathered so far instead of failing.
pub trait ProgressSink {
    fn on_progress(&mut self, percentage: u8) -> ControlFlow<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(u8) -> ControlFlow<()>,
{
    fn on_progress(&mut self, percentage: u8) -> ControlFlow<()> {
        self(percentage)
    }
}
