//! Tracing subscriber: coloured console output plus a plain-text log file.
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use super::utils::{line_timestamp, log_file_path, run_timestamp, strip_ansi};
use crate::cli::VERSION;

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "dotplate::stage";

/// The message of an event, and every other field as ` key=value`.
#[derive(Debug, Default)]
struct EventFields {
    message: String,
    extra: String,
}

impl EventFields {
    fn of(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            write!(self.extra, " {}={value}", field.name()).ok();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            write!(self.extra, " {}={value:?}", field.name()).ok();
        }
    }
}

/// Format one log file line.
fn file_line(level: Level, target: &str, timestamp: &str, fields: &EventFields) -> String {
    let msg = strip_ansi(&fields.message);
    if level == Level::INFO && target == STAGE_TARGET {
        format!("{timestamp} ==> {msg}")
    } else {
        format!("{timestamp} {:<5} {msg}{}", level.as_str(), fields.extra)
    }
}

/// Appends every event to `$XDG_CACHE_HOME/dotplate/<command>.log`.
///
/// The file is truncated when the layer is created, so it always holds the
/// most recent run of that command.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Create the log file for `command` and write the run header.
    ///
    /// Returns `None` when the file cannot be created; logging to the
    /// console continues regardless.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let mut file = File::create(&path).ok()?;
        writeln!(file, "# dotplate {VERSION} {command} {}", run_timestamp()).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let line = file_line(
            *meta.level(),
            meta.target(),
            &line_timestamp(),
            &EventFields::of(event),
        );
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console event format.
///
/// Stage headers are bold with an arrow, warnings and errors are labelled,
/// and debug output is dimmed and carries its structured fields.
#[derive(Debug)]
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let EventFields { message, extra } = EventFields::of(event);
        match *meta.level() {
            Level::ERROR => writeln!(writer, "\x1b[1;31merror:\x1b[0m {message}"),
            Level::WARN => writeln!(writer, "\x1b[1;33mwarning:\x1b[0m {message}"),
            Level::INFO if meta.target() == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{message}\x1b[0m")
            }
            Level::INFO => writeln!(writer, "  {message}"),
            _ => writeln!(writer, "\x1b[2m{message}{extra}\x1b[0m"),
        }
    }
}

/// Install the global subscriber.
///
/// The console shows `info` and above (`debug` too when `verbose`); the log
/// file for `command` always receives `debug` and above.  Only `info`
/// events go to stdout, so `list` and `render` output can be piped even in
/// verbose mode.  Call once, before anything is logged.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO).with_max_level(Level::INFO))
        .and(std::io::stderr.with_min_level(Level::DEBUG));

    let console = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(writer)
        .with_filter(console_level);
    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
