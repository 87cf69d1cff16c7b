//! Log output for all subcommands: one line per event, to stdout and/or a
//! file, filtered by target prefix.

use std::{
    collections::HashMap,
    fmt::{self, Write as _},
    fs::{File, OpenOptions},
    io::Write as _,
    path::{Path, PathBuf},
};
use nu_ansi_term::{Color, Style};
use serde::Deserialize;
use termcolor::ColorChoice;
use tracing::{field::{Field, Visit}, Event, Level, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::{
    filter::{FilterFn, LevelFilter},
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
};

use crate::prelude::*;


#[derive(Debug, confique::Config)]
pub(crate) struct LogConfig {
    /// Minimum level per target prefix, e.g. a module path like
    /// `country_browser::upstream` or a library like `hyper`. An event is
    /// checked against the longest prefix of its target found here and is
    /// dropped if no entry matches at all.
    ///
    ///    [log]
    ///    filters.country_browser = "info"
    ///    filters."country_browser::upstream" = "trace"
    ///    filters.hyper = "debug"
    #[config(default = { "country_browser": "debug" })]
    pub(crate) filters: Filters,

    /// Optional log file, written in addition to stdout. `${cmd}` is replaced
    /// with the subcommand name (`serve`, `browse` or `other`), e.g.
    /// "/var/log/countries-${cmd}.log".
    pub(crate) file: Option<PathBuf>,

    /// Whether to log to stdout at all.
    #[config(default = true)]
    pub(crate) stdout: bool,

    /// Log the headers of every incoming HTTP request at 'trace' level.
    #[config(default = false)]
    pub(crate) log_http_headers: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "HashMap<String, String>")]
pub(crate) struct Filters(HashMap<String, LevelFilter>);

impl TryFrom<HashMap<String, String>> for Filters {
    type Error = String;

    fn try_from(raw: HashMap<String, String>) -> Result<Self, Self::Error> {
        let mut out = HashMap::with_capacity(raw.len());
        for (prefix, level) in raw {
            let level = level.parse::<LevelFilter>()
                .map_err(|_| format!("invalid log level '{level}' for '{prefix}'"))?;
            out.insert(prefix, level);
        }
        Ok(Self(out))
    }
}

impl Filters {
    fn allows(&self, target: &str, level: &Level) -> bool {
        let best = self.0.iter()
            .filter(|(prefix, _)| target.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len());

        matches!(best, Some((_, max)) if level <= max)
    }

    fn max_level(&self) -> LevelFilter {
        self.0.values().copied().max().unwrap_or(LevelFilter::OFF)
    }
}

/// Sets the global subscriber. Panics when called twice.
pub(crate) fn init(config: &LogConfig, color: ColorChoice, cmd: &str) -> Result<()> {
    let filters = config.filters.clone();
    let max_level = filters.max_level();
    let filter = FilterFn::new(move |meta| filters.allows(meta.target(), meta.level()))
        .with_max_level_hint(max_level);

    let stdout_layer = config.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(EventFormatter(color))
            .with_writer(std::io::stdout)
    });

    let file_layer = match &config.file {
        None => None,
        Some(path) => {
            let file = open_log_file(path, cmd)?;
            Some(tracing_subscriber::fmt::layer()
                .event_format(EventFormatter(color))
                .with_writer(file)
                .with_ansi(color == ColorChoice::Always))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(())
}

fn open_log_file(path: &Path, cmd: &str) -> Result<File> {
    let Some(template) = path.to_str() else {
        bail!("log file path '{}' is not valid UTF-8", path.display());
    };
    let path = template.replace("${cmd}", cmd);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file '{path}'"))?;

    // Separates runs of the process.
    file.write_all(b"\n").with_context(|| format!("failed to write to log file '{path}'"))?;

    Ok(file)
}

/// `<time> <LEVEL> <target> >  <message> ~~ key=value ...` on one line.
#[derive(Clone, Copy)]
struct EventFormatter(ColorChoice);

impl<S, N> FormatEvent<S, N> for EventFormatter
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
        let ansi = match self.0 {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            _ => writer.has_ansi_escapes(),
        };

        // Records forwarded from `log` keep their real target in fields.
        let normalized = event.normalized_metadata();
        let meta = normalized.as_ref().unwrap_or(event.metadata());

        let (level_style, body_style) = level_styles(*meta.level());
        let dimmed = Style::new().dimmed();

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        styled(&mut writer, ansi, dimmed, |w| write!(w, "{now} "))?;
        styled(&mut writer, ansi, level_style, |w| write!(w, "{:5}", meta.level()))?;
        styled(&mut writer, ansi, dimmed, |w| write!(w, " {} >  ", meta.target()))?;
        styled(&mut writer, ansi, body_style, |w| {
            w.write_str(&fields.message)?;
            match (fields.message.is_empty(), fields.rest.is_empty()) {
                (_, true) => Ok(()),
                (true, false) => w.write_str(&fields.rest),
                (false, false) => write!(w, " ~~{}", fields.rest),
            }
        })?;

        writeln!(writer)
    }
}

fn level_styles(level: Level) -> (Style, Style) {
    match level {
        Level::ERROR => (Color::Red.bold(), Color::Red.normal()),
        Level::WARN => (Color::Yellow.bold(), Color::Yellow.normal()),
        Level::INFO => (Color::Green.normal(), Style::new()),
        Level::DEBUG => (Color::Blue.normal(), Style::new().dimmed()),
        Level::TRACE => (Color::Magenta.normal(), Color::DarkGray.normal()),
    }
}

/// Splits an event into its `message` and all other fields rendered as
/// ` key=value`. The `log.*` fields added by `tracing-log` are skipped.
#[derive(Default)]
struct FieldCollector {
    message: String,
    rest: String,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        match field.name() {
            "message" => { let _ = self.message.write_fmt(value); }
            name if name.starts_with("log.") => {}
            name => { let _ = write!(self.rest, " {name}={value}"); }
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, format_args!("{value}"));
    }
}

/// Runs `f`, wrapped in the escape codes of `style` if `ansi` is set.
fn styled(
    w: &mut Writer<'_>,
    ansi: bool,
    style: Style,
    f: impl FnOnce(&mut Writer<'_>) -> fmt::Result,
) -> fmt::Result {
    if !ansi {
        return f(w);
    }
    write!(w, "{}", style.prefix())?;
    f(w)?;
    write!(w, "{}", style.suffix())
}
