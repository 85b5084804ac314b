//! Agent logger adapters

mod recording;
mod tracing_logger;

pub use recording::{LogEntry, LogLevel, RecordingLogger};
pub use tracing_logger::TracingLogger;
