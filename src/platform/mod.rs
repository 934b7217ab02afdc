//! Platform bootstrap: the one place where target-specific code runs.
//!
//! A firmware binary picks exactly one [`Platform`] implementation at build
//! time (an LPC17xx board crate, a PIC32 board crate, the in-crate
//! [`loopback`] target for host runs…). Generics monomorphize the whole
//! core against that choice; there is no runtime target switch and the
//! dispatch loop contains no hardware conditionals.
use heapless::Vec;

use crate::{
    infra::log::LogSink,
    transport::traits::{
        bridge_clock::BridgeClock, can_bus::CanBus, host_pipeline::HostPipeline,
    },
};

pub mod loopback;

/// CAN controllers one bridge can own. The supported vehicle interfaces
/// carry two (a high-speed and a medium-speed bus).
pub const MAX_BUSES: usize = 2;

/// Hardware handles produced by bootstrap. They live for the rest of the
/// power cycle, owned by the dispatch loop.
pub struct PlatformParts<P: Platform> {
    /// Initialized CAN controllers, addressed by index.
    pub buses: Vec<P::Bus, MAX_BUSES>,
    pub clock: P::Clock,
    pub pipeline: P::Pipeline,
    pub log: P::Log,
}

/// One-time hardware setup contract.
///
/// `initialize` consumes the platform value, so bootstrap cannot run twice
/// and no clock, bus, or log handle exists before it ran: the ordering
/// invariant (bootstrap before everything) holds by construction.
///
/// Implementations bring up the clock tree, install interrupt vectors,
/// reset and configure each CAN controller ([`CanBus::initialize`]), start
/// the millisecond timer, and open the debug sink, then hand the parts
/// over.
pub trait Platform: Sized {
    type Bus: CanBus;
    type Clock: BridgeClock;
    type Pipeline: HostPipeline;
    type Log: LogSink;
    type Error: core::fmt::Debug;

    fn initialize(self) -> Result<PlatformParts<Self>, Self::Error>;
}
