//! Rolling in-memory logger
//!
//! A `tracing` layer that formats every event into one line, forwards it to the
//! browser console and keeps the most recent lines in a byte-bounded buffer so a
//! page can show its own diagnostics. Native builds log to stderr through the
//! `fmt` layer instead of the console.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chrono::Local;
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, Layer},
    prelude::*,
    registry::LookupSpan,
    EnvFilter,
};

pub const DEFAULT_MAX_BYTES: usize = 256 * 1024; // 256KB

/// Line buffer that drops its oldest entries once `max_bytes` is exceeded
pub struct RollingLogBuffer {
    state: Mutex<BufferState>,
    max_bytes: usize,
}

#[derive(Default)]
struct BufferState {
    entries: VecDeque<String>,
    bytes: usize,
}

impl RollingLogBuffer {
    pub fn new() -> Self {
        Self::with_max_bytes(DEFAULT_MAX_BYTES)
    }

    pub fn with_max_bytes(max_bytes: usize) -> Self {
        RollingLogBuffer {
            state: Mutex::new(BufferState::default()),
            max_bytes: max_bytes.max(1),
        }
    }

    /// Append a formatted entry, evicting from the front until it fits
    pub fn write(&self, formatted_entry: &str) {
        let entry = clip(formatted_entry, self.max_bytes);
        let mut state = self.lock();

        while state.bytes + entry.len() > self.max_bytes {
            match state.entries.pop_front() {
                Some(oldest) => state.bytes -= oldest.len(),
                None => break,
            }
        }

        state.bytes += entry.len();
        state.entries.push_back(entry.to_string());
    }

    /// All retained entries, oldest first
    pub fn read_logs(&self) -> String {
        self.lock().entries.iter().map(String::as_str).collect()
    }

    /// Bytes currently retained
    pub fn current_size(&self) -> usize {
        self.lock().bytes
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RollingLogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest prefix of `entry` that fits in `max` bytes without splitting a char
fn clip(entry: &str, max: usize) -> &str {
    if entry.len() <= max {
        return entry;
    }
    let mut end = max;
    while !entry.is_char_boundary(end) {
        end -= 1;
    }
    &entry[..end]
}

/// Tracing layer feeding the rolling buffer and the console
pub struct RollingLayer {
    buffer: Arc<RollingLogBuffer>,
}

impl RollingLayer {
    pub fn new(buffer: Arc<RollingLogBuffer>) -> Self {
        RollingLayer { buffer }
    }

    fn format_event<S>(&self, event: &Event, ctx: Context<'_, S>) -> String
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let metadata = event.metadata();

        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let span_info = ctx
            .event_span(event)
            .map(|span| format!(" [{}]", span.metadata().name()))
            .unwrap_or_default();

        let mut line = format!(
            "[{}] {} - {}{} - {}",
            timestamp,
            metadata.level(),
            metadata.target(),
            span_info,
            visitor.message.unwrap_or_default()
        );
        if !visitor.fields.is_empty() {
            line.push(' ');
            line.push_str(&visitor.fields.join(" "));
        }
        line.push('\n');
        line
    }
}

impl<S> Layer<S> for RollingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event, ctx: Context<'_, S>) {
        let formatted = self.format_event(event, ctx);
        #[cfg(target_arch = "wasm32")]
        console_emit(event.metadata().level(), &formatted);
        self.buffer.write(&formatted);
    }
}

#[cfg(target_arch = "wasm32")]
fn console_emit(level: &tracing::Level, line: &str) {
    use tracing::Level;

    let line = line.trim_end();
    if *level == Level::ERROR {
        web_sys::console::error_1(&line.into());
    } else if *level == Level::WARN {
        web_sys::console::warn_1(&line.into());
    } else if *level == Level::INFO {
        web_sys::console::log_1(&line.into());
    } else {
        web_sys::console::debug_1(&line.into());
    }
}

/// Splits the `message` field from the structured ones
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<String>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, rendered: String) {
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push(format!("{}={}", field.name(), rendered));
        }
    }
}

impl Visit for FieldCollector {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}=\"{}\"", field.name(), value));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, format!("\"{}\"", value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

static GLOBAL_BUFFER: OnceLock<Arc<RollingLogBuffer>> = OnceLock::new();

const FALLBACK_FILTER: &str = "info";

/// Install the global subscriber.
///
/// `filter` uses `EnvFilter` directive syntax, e.g. `info,sync_admin_frontend=debug`.
/// An unparsable filter falls back to `info` and is reported through the
/// installed logger.
pub fn init_logger(
    app_name: &str,
    filter: &str,
    max_bytes: usize,
) -> Result<Arc<RollingLogBuffer>, Box<dyn std::error::Error>> {
    let (env_filter, filter_error) = match EnvFilter::try_new(filter) {
        Ok(f) => (f, None),
        Err(e) => (EnvFilter::new(FALLBACK_FILTER), Some(e.to_string())),
    };
    let buffer = Arc::new(RollingLogBuffer::with_max_bytes(max_bytes));

    let stderr_layer = cfg!(not(target_arch = "wasm32"))
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(RollingLayer::new(buffer.clone()))
        .with(stderr_layer)
        .try_init()?;

    GLOBAL_BUFFER
        .set(buffer.clone())
        .map_err(|_| "Logger already initialized")?;

    if let Some(error) = filter_error {
        tracing::warn!(filter, fallback = FALLBACK_FILTER, error = %error, "invalid log filter");
    }
    tracing::info!(app = app_name, "rolling logger initialized");
    Ok(buffer)
}

/// Read current logs
pub fn read_logs() -> Result<String, String> {
    GLOBAL_BUFFER
        .get()
        .map(|b| b.read_logs())
        .ok_or_else(|| "Logger not initialized".to_string())
}
