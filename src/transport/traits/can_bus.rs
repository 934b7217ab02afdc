//! Minimal abstraction over one CAN controller. Lets the core plug into
//! different microcontroller families (on-chip controllers, SPI transceivers,
//! socketcan on a host…) without a single hardware branch in the loop.
use crate::{error::TransmitError, transport::can_frame::CanMessage};

/// Nominal bitrates the bridge supports on a vehicle bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bitrate {
    Rate125Kbps,
    Rate250Kbps,
    Rate500Kbps,
}

/// Contract to configure, send on, and poll one CAN controller.
///
/// Every operation is non-blocking: the dispatch loop calls these once per
/// iteration and must get control back immediately.
pub trait CanBus {
    /// Controller-specific fault type.
    type Error: core::fmt::Debug;

    /// Configure the controller for the given bitrate. Called exactly once,
    /// from platform bootstrap, before any `send` or `poll`.
    fn initialize(&mut self, bitrate: Bitrate) -> Result<(), TransmitError<Self::Error>>;

    /// Place a frame in the hardware transmit buffer. Fails fast with
    /// [`TransmitError::BufferFull`] instead of waiting; the caller retries
    /// on a later loop iteration.
    fn send(&mut self, frame: &CanMessage) -> Result<(), TransmitError<Self::Error>>;

    /// Hand over at most one received frame, in wire receipt order.
    /// Returns `None` when nothing is pending. A frame with an invalid
    /// length never surfaces here; the driver drops and counts it.
    fn poll(&mut self) -> Option<CanMessage>;

    /// Read and reset the count of frames dropped on the receive side since
    /// the last call. The loop reads this once per iteration and logs a
    /// nonzero total from thread context. Drivers without overflow
    /// accounting keep the default.
    fn take_dropped(&mut self) -> u32 {
        0
    }
}
