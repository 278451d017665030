use tracing::info;

/// Receives human-readable status lines while a clone runs.
///
/// Injected into the engine so progress can go to a console, a log stream,
/// or a test recorder without the engine knowing which.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Routes progress lines to the `tracing` log stream.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn notify(&self, message: &str) {
        info!("{message}");
    }
}

/// Discards progress lines.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn notify(&self, _message: &str) {}
}
