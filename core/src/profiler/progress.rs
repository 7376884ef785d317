use std::ops::ControlFlow;

use busviz_common::progress::ProgressSink;

pub(crate) const START: u8 = 0;
pub(crate) const CLEANED: u8 = 5;
pub(crate) const LISTED: u8 = 10;
pub(crate) const DONE: u8 = 100;

const FETCH_SPAN: usize = 85;

/// Percentage reached after `done` of `total` detail fetches.
pub(crate) fn fetch_step(done: usize, total: usize) -> u8 {
    if total == 0 {
        return LISTED + FETCH_SPAN as u8;
    }
    let done = done.min(total);
    LISTED + (FETCH_SPAN * done / total) as u8
}

/// Wraps the caller's sink, keeping reported values inside `0..=100` and
/// never lower than a previous report. Remembers a cancellation request.
pub(crate) struct Reporter<'a> {
    sink: Option<&'a mut dyn ProgressSink>,
    last: u8,
    cancelled: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: Option<&'a mut dyn ProgressSink>) -> Self {
        Self {
            sink,
            last: 0,
            cancelled: false,
        }
    }

    pub fn report(&mut self, percentage: u8) -> ControlFlow<()> {
        let value = percentage.min(DONE).max(self.last);
        self.last = value;
        if let Some(sink) = self.sink.as_mut()
            && sink.on_progress(value).is_break()
        {
            self.cancelled = true;
        }
        if self.cancelled {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
