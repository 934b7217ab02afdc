//! `canbridge` library: the platform-independent core of a vehicle
//! CAN-to-host bridge firmware, for `no_std` targets. The crate exposes the
//! hardware abstraction traits (CAN bus, clock, host pipeline, log sink),
//! the diagnostic request/response machinery, and the cooperative dispatch
//! loop that ties them together. Register-level bring-up lives in the
//! per-target crates implementing [`platform::Platform`].
#![no_std]

#[cfg(test)]
extern crate std;

//==================================================================================
/// Firmware dispatch loop and its outbound queue.
pub mod bridge;
/// Diagnostic request correlation, decoding, and bounded rendering.
pub mod diagnostic;
/// Domain and transport errors (frame construction, transmission,
/// request admission, bootstrap).
pub mod error;
/// Bounded formatting and the debug logging facade.
pub mod infra;
/// Platform bootstrap contract and the in-memory loopback target.
pub mod platform;
/// CAN transport layer: frames, receive queue, hardware traits.
pub mod transport;
//==================================================================================
