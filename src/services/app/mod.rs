pub mod log_sink;

pub use log_sink::{CollectingSink, LogCrateSink, LogSink, SilentSink};
