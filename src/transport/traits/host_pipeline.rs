//! Host-facing output seam.
//!
//! The bridge pushes every received frame and every rendered diagnostic
//! string into a pipeline; how the pipeline frames them for USB, UART, or
//! Bluetooth is the target's concern. Deliveries are best effort: a pipeline
//! whose outbound buffers are full drops data for its interface only and the
//! loop carries on.
use crate::transport::can_frame::CanMessage;

/// Consumer of translated bus traffic.
pub trait HostPipeline {
    /// One frame received on `bus` at `received_at_ms` (bridge clock time).
    fn forward_frame(&mut self, bus: u8, message: &CanMessage, received_at_ms: u32);

    /// One rendered diagnostic response, e.g. `"750 rpm"`.
    fn forward_diagnostic(&mut self, bus: u8, rendered: &str);
}
