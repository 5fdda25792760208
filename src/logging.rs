use std::io::{self, Write};

use anstyle::Style;
use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
#[cfg(all(unix, feature = "journald"))]
use systemd_journal_logger::{JournalLog, connected_to_journal, current_exe_identifier};

/// Turns on timestamps for terminal output when set to anything but `0`.
const TIMESTAMPS_VAR: &str = "PORKBUN_LOG_TIMESTAMPS";

/// `Jul 08 2001 14:46:23`
const TIMESTAMP_FMT: &str = "%b %d %Y %H:%M:%S";

/// Logger for diagnostics. Nothing is ever logged to `stdout`, which belongs to command output and to the tool
/// server's JSON-RPC stream.
pub struct Logger {
    filter: LevelFilter,
    sink: Sink,
}

/// Where log lines end up.
enum Sink {
    /// Coloured lines on `stderr`. Colour and `NO_COLOR` handling come from [`anstream`].
    Stderr { timestamps: bool },
    /// Structured entries for journald, which stamps them itself.
    #[cfg(all(unix, feature = "journald"))]
    Journal(JournalLog),
}

/// Level styles, matching the colours `journalctl` uses.
#[rustfmt::skip]
mod styles {
    use anstyle::{Ansi256Color, AnsiColor, Color, Style};

    pub const TRACE: Style = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(245))));
    pub const DEBUG: Style = Style::new();
    pub const INFO: Style  = Style::new().bold();
    pub const WARN: Style  = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(185)))).bold();
    pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold();
}

fn level_style(level: Level) -> (Style, &'static str) {
    match level {
        Level::Trace => (styles::TRACE, "[trace]"),
        Level::Debug => (styles::DEBUG, "[debug]"),
        Level::Info => (styles::INFO, "[info]"),
        Level::Warn => (styles::WARN, "[warn]"),
        Level::Error => (styles::ERROR, "[error]"),
    }
}

impl Logger {
    pub fn new(filter: LevelFilter) -> Self {
        Self { filter, sink: Sink::detect() }
    }

    /// Installs this logger as the global [`log`] backend.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let filter = self.filter;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(filter))
    }

    fn try_log(&self, record: &Record) -> io::Result<()> {
        // Dependencies (reqwest, hyper, ...) log plenty on their own.
        if !record.target().starts_with(env!("CARGO_CRATE_NAME")) || !self.enabled(record.metadata()) {
            return Ok(());
        }

        match &self.sink {
            Sink::Stderr { timestamps } => {
                let mut output = anstream::stderr().lock();
                write_line(&mut output, record, *timestamps)?;
                output.flush()
            },
            #[cfg(all(unix, feature = "journald"))]
            Sink::Journal(journal) => journal.journal_send(record),
        }
    }
}

impl Sink {
    fn detect() -> Self {
        #[cfg(all(unix, feature = "journald"))]
        if let Some(journal) = connect_journal() {
            return Sink::Journal(journal);
        }

        let timestamps = crate::get_var(TIMESTAMPS_VAR).is_some_and(|v| v != "0");
        Sink::Stderr { timestamps }
    }
}

/// Formats one record as a terminal line. The record's target is only shown at debug and trace levels, where it helps
/// to know which module is talking.
fn write_line(output: &mut impl Write, record: &Record, timestamps: bool) -> io::Result<()> {
    if timestamps {
        write!(output, "{} ", Local::now().format(TIMESTAMP_FMT))?;
    }

    if record.level() >= Level::Debug {
        write!(output, "{} ", record.target())?;
    }

    let (style, tag) = level_style(record.level());
    writeln!(output, "{style}{tag} {}{style:#}", record.args())
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        let _ = self.try_log(record);
    }

    fn flush(&self) {
        match &self.sink {
            Sink::Stderr { .. } => {
                let _ = anstream::stderr().flush();
            },
            #[cfg(all(unix, feature = "journald"))]
            Sink::Journal(journal) => <JournalLog as Log>::flush(journal),
        }
    }
}

#[cfg(all(unix, feature = "journald"))]
fn connect_journal() -> Option<JournalLog> {
    if !connected_to_journal() {
        return None;
    }

    let identifier = current_exe_identifier().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let journal = JournalLog::empty()
        .ok()?
        .with_syslog_identifier(identifier)
        .add_extra_field("version", env!("CARGO_PKG_VERSION"));
    Some(journal)
}
