//! Tracing subscriber initialization.
//!
//! `RUST_LOG` wins over the configured filter when set. On wasm32 output goes
//! to the browser console and timestamps are left to the devtools.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `info,dian_client=debug`.
    pub filter: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl LogSettings {
    pub fn new(filter: impl Into<String>, json: bool) -> Self {
        Self {
            filter: filter.into(),
            json,
        }
    }

    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init(settings: &LogSettings) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(target_arch = "wasm32")]
pub fn init(settings: &LogSettings) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_writer(console::ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .with_target(false);

    let _ = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(LogSettings::new("debug", false).env_filter())
        .with_test_writer()
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    /// Buffers one formatted event and hands it to `console.log` on drop.
    #[derive(Default)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&line.into());
            }
        }
    }
}
