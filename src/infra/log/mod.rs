//! Best-effort debug logging.
//!
//! The platform supplies a [`LogSink`] (UART console, semihosting, in-memory
//! capture…). [`Logger`] formats each line into a fixed buffer with
//! [`BoundedWriter`](crate::infra::fmt::BoundedWriter) so a log call can
//! never overrun memory, and hands the line to the sink. Logging must never
//! fail: a sink that cannot keep up simply drops the line.
//!
//! Production images build without the `debug-log` feature, which compiles
//! [`Logger::log`] down to a no-op: no formatting runs and no sink is
//! touched, at every [`debug_log!`](crate::debug_log) call site in every
//! crate.

#[cfg(feature = "debug-log")]
use core::fmt::Write;

#[cfg(feature = "debug-log")]
use crate::infra::fmt::BoundedWriter;

/// Upper bound for one formatted log line, terminator included.
pub const MAX_LOG_LINE: usize = 120;

/// Destination for debug text. Implementations must not block for long and
/// must not panic; dropping a line is acceptable.
pub trait LogSink {
    fn write_line(&mut self, line: &str);
}

/// Sink that discards everything. Default for targets without a console.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl LogSink for NullLog {
    fn write_line(&mut self, _line: &str) {}
}

/// Bounded line formatter in front of a [`LogSink`].
pub struct Logger<S: LogSink> {
    sink: S,
}

impl<S: LogSink> Logger<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Format and emit one line. Compiled to a no-op without `debug-log`.
    #[cfg_attr(not(feature = "debug-log"), allow(unused_variables))]
    pub fn log(&mut self, args: core::fmt::Arguments<'_>) {
        #[cfg(feature = "debug-log")]
        {
            let mut buf = [0u8; MAX_LOG_LINE];
            let mut writer = BoundedWriter::new(&mut buf);
            let _ = writer.write_fmt(args);
            self.sink.write_line(writer.as_str());
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

/// Emit a formatted debug line through a [`Logger`].
///
/// The `debug-log` gate lives inside [`Logger::log`], in this crate, so a
/// downstream firmware crate gets the logging behavior of the `canbridge`
/// build it links against without declaring any feature of its own.
#[macro_export]
macro_rules! debug_log {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log(core::format_args!($($arg)*))
    };
}
