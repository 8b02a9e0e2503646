//! tracing subscriber that writes to the browser console
//!
//! Each event is formatted by `tracing_subscriber::fmt` into a buffer and
//! flushed to the console method matching its level when the writer drops.

use std::io;

use tracing::{subscriber::set_global_default, Level, Metadata, Subscriber};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

use crate::error::{Error, Result};

/// Builds one `ConsoleWriter` per event
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let message = wasm_bindgen::JsValue::from_str(text.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

// env_filter = trace|debug|info|warn|error|off, or per-target directives
pub fn get_subscriber<Sink>(env_filter: &str, sink: Sink) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(env_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .without_time()
            .with_target(true)
            .with_writer(sink),
    )
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<()> {
    set_global_default(subscriber).map_err(|err| Error::LoggingInit(err.to_string()))
}

/// Install the console subscriber. Fails if one is already installed.
pub fn init_console_logging(env_filter: &str) -> Result<()> {
    init_subscriber(get_subscriber(env_filter, ConsoleMakeWriter))
}
