//! Per-render diagnostic sinks.
//!
//! Every render entry point takes a `&mut dyn DiagnosticSink` instead of
//! writing to a process-wide formatter. Sinks never report failures back:
//! a broken diagnostics stream must not abort a render.

use std::fmt;
use std::io::Write;

/// Destination for progress and debug lines produced during a render.
pub trait DiagnosticSink {
    /// Record one formatted line.
    fn emit(&mut self, line: fmt::Arguments<'_>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        (**self).emit(line);
    }
}

/// Write a formatted line to a sink.
///
/// ```
/// use radar_common::{diag, diagnostics::MemorySink};
///
/// let mut sink = MemorySink::default();
/// diag!(sink, "map area {}", 42);
/// assert_eq!(sink.lines, vec!["map area 42".to_string()]);
/// ```
#[macro_export]
macro_rules! diag {
    ($sink:expr, $($arg:tt)+) => {{
        use $crate::diagnostics::DiagnosticSink as _;
        $sink.emit(format_args!($($arg)+))
    }};
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _line: fmt::Arguments<'_>) {}
}

/// Forwards lines to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        tracing::debug!(target: "radar::diagnostics", "{}", line);
    }
}

/// Writes one line per diagnostic to any `io::Write`, ignoring I/O errors.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Whether any write has failed so far.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for WriterSink<W> {
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if writeln!(self.writer, "{}", line).is_err() {
            self.failed = true;
        }
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl MemorySink {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_swallows_errors() {
        let mut sink = WriterSink::new(BrokenPipe);
        diag!(sink, "value {}", 1);
        diag!(sink, "value {}", 2);
        assert!(sink.has_failed());
    }

    #[test]
    fn test_writer_sink_writes_lines() {
        let mut sink = WriterSink::new(Vec::new());
        diag!(sink, "a {}", 1);
        diag!(sink, "b");
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "a 1\nb\n");
    }

    #[test]
    fn test_dyn_sink_via_macro() {
        let mut memory = MemorySink::default();
        {
            let sink: &mut dyn DiagnosticSink = &mut memory;
            diag!(sink, "through {}", "dyn");
        }
        assert!(memory.contains("through dyn"));
    }
}
