//! Progress reporting for long-running operations
//!
//! Operations take a `&mut dyn ProgressSink`. Any `FnMut(&str)` closure is a
//! sink, which covers the common case of forwarding text to a UI.

/// Receiver for progress notifications
pub trait ProgressSink {
    /// A line of progress text
    fn message(&mut self, text: &str);

    /// One file finished writing; `total_bytes` is the running total
    fn file_written(&mut self, path: &str, total_bytes: u64) {
        self.message(&format!("Extracted {path} ({total_bytes} bytes written)"));
    }

    /// The operation has completed, successfully or not
    fn finished(&mut self) {}
}

impl<F: FnMut(&str)> ProgressSink for F {
    fn message(&mut self, text: &str) {
        self(text)
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn message(&mut self, _text: &str) {}

    fn file_written(&mut self, _path: &str, _total_bytes: u64) {}
}

/// Sink that forwards messages to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn message(&mut self, text: &str) {
        log::info!("{text}");
    }
}

/// Wraps a sink for a nested operation, suppressing its completion signal
///
/// Used when one operation drives another with the caller's sink, so the
/// caller sees a single `finished` at the very end.
pub struct NestedSink<'a> {
    inner: &'a mut dyn ProgressSink,
}

impl<'a> NestedSink<'a> {
    /// Wrap a sink
    pub fn new(inner: &'a mut dyn ProgressSink) -> Self {
        Self { inner }
    }
}

impl ProgressSink for NestedSink<'_> {
    fn message(&mut self, text: &str) {
        self.inner.message(text);
    }

    fn file_written(&mut self, path: &str, total_bytes: u64) {
        self.inner.file_written(path, total_bytes);
    }

    fn finished(&mut self) {}
}

impl std::fmt::Debug for NestedSink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedSink").finish_non_exhaustive()
    }
}
