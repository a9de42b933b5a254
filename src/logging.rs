//! Log output in the form Xcode picks up from build phase scripts.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Formats events as `note: …`, `warning: …` or `error: …` lines.
///
/// Xcode shows lines with these prefixes in the build log and issue navigator.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcodeFormat;

impl XcodeFormat {
    /// The prefix Xcode expects for `level`.
    pub fn prefix(level: Level) -> &'static str {
        match level {
            Level::ERROR => "error",
            Level::WARN => "warning",
            Level::INFO => "note",
            Level::DEBUG | Level::TRACE => "debug",
        }
    }
}

impl<S, N> FormatEvent<S, N> for XcodeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}: ", Self::prefix(*event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
