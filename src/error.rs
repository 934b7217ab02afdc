//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (frame construction,
//! transmission, diagnostic request admission, etc.).
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Failures at the wire boundary while constructing a [`CanMessage`](crate::transport::can_frame::CanMessage).
pub enum FrameError {
    /// Payload length exceeds the classic CAN maximum of eight bytes.
    #[error("Invalid payload length: {len}")]
    InvalidLength { len: usize },
}

//==================================================================================TRANSMIT_ERROR

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors reported by [`CanBus`](crate::transport::traits::can_bus::CanBus)
/// implementations when queueing a frame for transmission.
pub enum TransmitError<E: core::fmt::Debug> {
    /// Hardware transmit buffer is full. Transient: the caller may retry on a
    /// later loop iteration.
    #[error("Transmit buffer full")]
    BufferFull,

    /// The controller was never initialized. Ordering error; unreachable
    /// after a correct bootstrap.
    #[error("Bus not initialized")]
    NotInitialized,

    /// Controller-specific fault propagated from the driver.
    #[error("Driver fault: {0:?}")]
    Driver(E),
}

//==================================================================================DIAGNOSTIC_ERROR

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised when admitting a new diagnostic request.
pub enum DiagnosticError {
    /// The outstanding-request table has no free slot.
    #[error("Request table full")]
    TableFull,
}

//==================================================================================DISPATCH_ERROR

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors returned by the bridge when queueing outbound work.
pub enum DispatchError {
    /// The caller named a bus index this bridge does not own.
    #[error("Unknown bus index: {bus}")]
    UnknownBus { bus: u8 },

    /// The outbound frame queue has no free slot. Transient: drained a frame
    /// at a time by the loop.
    #[error("Transmit queue full")]
    TransmitQueueFull,

    /// Request admission failure.
    #[error(transparent)]
    Diagnostic(#[from] DiagnosticError),
}

//==================================================================================BOOT_ERROR

#[derive(Error, Debug)]
/// Failure surfaced while bringing the platform up.
pub enum BootError<E: core::fmt::Debug> {
    /// Platform-specific initialization fault (clock tree, controller reset…).
    #[error("Platform initialization failed: {0:?}")]
    Platform(E),
}
