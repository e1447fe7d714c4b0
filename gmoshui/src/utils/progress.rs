//! Progress bar utilities

use gmod_gma::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a standard progress bar
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress sink drawing onto an indicatif bar
///
/// Each written file advances the bar by one. With `echo` set, messages
/// are also printed above the bar so they stay visible after it clears.
#[derive(Debug)]
pub struct BarSink {
    bar: ProgressBar,
    echo: bool,
}

impl BarSink {
    /// Wrap a bar or spinner
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar, echo: false }
    }

    /// Print every message above the bar
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl ProgressSink for BarSink {
    fn message(&mut self, text: &str) {
        if self.echo {
            self.bar.println(text);
        }
        self.bar.set_message(text.to_string());
    }

    fn file_written(&mut self, path: &str, _total_bytes: u64) {
        self.bar.inc(1);
        self.bar.set_message(path.to_string());
    }

    fn finished(&mut self) {
        self.bar.finish_and_clear();
    }
}
