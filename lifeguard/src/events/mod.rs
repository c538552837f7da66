//! Event sinks.
//!
//! Records report rejected writes as `"error"` events when the caller did
//! not pass an error callback. Each record kind may carry its own sink;
//! otherwise the process-wide sink set here is used.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use parking_lot::RwLock;
use std::sync::Arc;

#[cfg(test)]
pub(crate) static GLOBAL_SINK_TEST_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

/// Event emitted when a write is rejected.
pub const ERROR_EVENT: &str = "error";

static GLOBAL_EVENT_SINK: RwLock<Option<Arc<dyn EventSink>>> = RwLock::new(None);

/// Sets the current global event sink.
pub fn set_event_sink(sink: Arc<dyn EventSink>) {
    *GLOBAL_EVENT_SINK.write() = Some(sink);
}

/// Clears the current global event sink.
pub fn clear_event_sink() {
    *GLOBAL_EVENT_SINK.write() = None;
}

/// Gets the current global event sink.
///
/// Returns a `NoOpEventSink` if no sink is set.
#[must_use]
pub fn get_event_sink() -> Arc<dyn EventSink> {
    GLOBAL_EVENT_SINK
        .read()
        .clone()
        .unwrap_or_else(|| Arc::new(NoOpEventSink))
}
