use std::ops::ControlFlow;

use busviz_common::progress::ProgressSink;
use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::input::InputHandle;

const TIP: &str = "You can press 'q' to finish early";

/// Drives the progress bar attached to `span` and turns a key press into a
/// cancellation request.
pub struct ProgressBarSink<'a> {
    span: Span,
    input: &'a InputHandle,
}

impl<'a> ProgressBarSink<'a> {
    pub fn new(span: Span, input: &'a InputHandle) -> Self {
        let style = ProgressStyle::with_template("{spinner:.blue} [{bar:40.green/white}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&[
                "▁▁▁▁▁",
                "▁▂▂▂▁",
                "▁▄▂▄▁",
                "▂▄▆▄▂",
                "▄▆█▆▄",
                "▂▄▆▄▂",
                "▁▄▂▄▁",
                "▁▂▂▂▁",
            ])
            .progress_chars("━╸ ");

        span.pb_set_style(&style);
        span.pb_set_length(100);
        span.pb_set_message(&format!("{}", TIP.italic().white()));
        Self { span, input }
    }
}

impl ProgressSink for ProgressBarSink<'_> {
    fn on_progress(&mut self, percentage: u8) -> ControlFlow<()> {
        self.span.pb_set_position(u64::from(percentage));
        if self.input.should_interrupt() {
            self.span.pb_set_message("finishing early...");
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
