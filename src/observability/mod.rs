//! Observability subsystem for clientedb
//!
//! Provides:
//! - Typed lifecycle and write events
//! - Subscriber installation for the CLI
//!
//! Call sites emit through `tracing` directly, naming the event and
//! attaching their context as structured fields:
//!
//! ```ignore
//! use clientedb::observability::Event;
//!
//! tracing::info!(event = Event::CollectionCreated.as_str(), collection = %name);
//! ```
//!
//! The validator never logs.

mod events;

pub use events::Event;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs a JSON `tracing` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG`, falling back to `default_filter`.
/// Installing twice is a no-op.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Captures events emitted on the current thread as their JSON `fields`.
#[cfg(test)]
pub(crate) mod capture {
    use serde_json::Value as Json;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn events<F: FnOnce()>(f: F) -> Vec<Json> {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Json>(line).unwrap()["fields"].clone())
            .collect()
    }

    /// The fields of the first event named `name`.
    pub(crate) fn find<'a>(events: &'a [Json], name: &str) -> Option<&'a Json> {
        events.iter().find(|fields| fields["event"] == name)
    }
}
