//! Bounded rendering of decoded diagnostic values.
//!
//! Formatting mechanism only; the interpretation policy (what the bytes
//! mean) is the decode function supplied with each request.
use core::fmt::Write;

use crate::{diagnostic::DiagnosticResponse, infra::fmt::BoundedWriter};

/// Suggested buffer size for one rendered response.
pub const MAX_RENDERED_LEN: usize = 32;

/// Render `value` (and `unit`, when non-empty) into `out`.
///
/// Never writes past `out`; oversized output is truncated at a character
/// boundary. The returned slice borrows from `out` and carries the rendered
/// length, so no terminator byte is needed.
pub fn render_value<'a>(value: f32, unit: &str, out: &'a mut [u8]) -> &'a str {
    let mut writer = BoundedWriter::new(out);
    if unit.is_empty() {
        let _ = write!(writer, "{}", value);
    } else {
        let _ = write!(writer, "{} {}", value, unit);
    }
    writer.into_str()
}

impl DiagnosticResponse {
    /// Render this response into a caller-supplied buffer.
    pub fn render<'a>(&self, out: &'a mut [u8]) -> &'a str {
        render_value(self.value, self.unit, out)
    }
}
