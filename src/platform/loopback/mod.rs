//! Software target: an in-memory platform with no hardware behind it.
//!
//! Stands in for a vehicle interface during host-side runs and drives the
//! integration tests. The bus records every sent frame, can echo traffic
//! back to its own receive queue, and can simulate a saturated transmit
//! buffer; the clock is advanced by hand; the pipeline and log sink capture
//! what the bridge pushes at them.
use core::convert::Infallible;

use heapless::{String, Vec};

use crate::{
    error::TransmitError,
    infra::log::{LogSink, MAX_LOG_LINE},
    platform::{Platform, PlatformParts, MAX_BUSES},
    transport::{
        can_frame::CanMessage,
        queue::ReceiveQueue,
        traits::{
            bridge_clock::BridgeClock,
            can_bus::{Bitrate, CanBus},
            host_pipeline::HostPipeline,
        },
    },
};

/// Backing storage of the loopback receive queue (15 usable slots).
pub const RX_QUEUE_SLOTS: usize = 16;

/// Sent frames kept in the transmit record.
pub const SENT_RECORD_SLOTS: usize = 32;

//==================================================================================BUS

/// In-memory CAN controller.
pub struct LoopbackBus {
    initialized: bool,
    echo: bool,
    transmit_full: bool,
    rx: ReceiveQueue<RX_QUEUE_SLOTS>,
    sent: Vec<CanMessage, SENT_RECORD_SLOTS>,
}

impl LoopbackBus {
    pub fn new() -> Self {
        Self {
            initialized: false,
            echo: false,
            transmit_full: false,
            rx: ReceiveQueue::new(),
            sent: Vec::new(),
        }
    }

    /// When set, every sent frame is also delivered to this bus's own
    /// receive queue (wire loopback).
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Simulate a full hardware transmit buffer.
    pub fn set_transmit_full(&mut self, full: bool) {
        self.transmit_full = full;
    }

    /// Deliver a frame as if the receive interrupt had queued it. Returns
    /// `false` when the queue overflowed and the frame was dropped.
    pub fn inject(&mut self, message: CanMessage) -> bool {
        self.rx.push(message)
    }

    /// Frames the bridge sent, in order.
    pub fn sent(&self) -> &[CanMessage] {
        &self.sent
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Receive-side frames dropped to overflow so far.
    pub fn dropped(&self) -> u32 {
        self.rx.dropped()
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CanBus for LoopbackBus {
    type Error = Infallible;

    fn initialize(&mut self, _bitrate: Bitrate) -> Result<(), TransmitError<Self::Error>> {
        self.initialized = true;
        Ok(())
    }

    fn send(&mut self, frame: &CanMessage) -> Result<(), TransmitError<Self::Error>> {
        if !self.initialized {
            return Err(TransmitError::NotInitialized);
        }
        if self.transmit_full || self.sent.is_full() {
            return Err(TransmitError::BufferFull);
        }
        // Capacity checked above.
        let _ = self.sent.push(*frame);
        if self.echo {
            self.rx.push(*frame);
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<CanMessage> {
        self.rx.pop()
    }

    fn take_dropped(&mut self) -> u32 {
        self.rx.take_dropped()
    }
}

//==================================================================================CLOCK

/// Hand-advanced millisecond clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualClock {
    now: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Start near the wraparound point to exercise difference arithmetic.
    pub fn starting_at(now: u32) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, millis: u32) {
        self.now = self.now.wrapping_add(millis);
    }
}

impl BridgeClock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now
    }

    fn delay_ms(&mut self, millis: u32) {
        // Simulated time: a delay is just a jump forward.
        self.now = self.now.wrapping_add(millis);
    }
}

//==================================================================================PIPELINE

/// Pipeline that captures everything pushed at the host.
#[derive(Default)]
pub struct BufferPipeline {
    /// `(bus, frame, received_at_ms)` per forwarded frame.
    pub frames: Vec<(u8, CanMessage, u32), 32>,
    /// `(bus, rendered text)` per diagnostic response.
    pub diagnostics: Vec<(u8, String<32>), 8>,
}

impl HostPipeline for BufferPipeline {
    fn forward_frame(&mut self, bus: u8, message: &CanMessage, received_at_ms: u32) {
        // Best effort, like a saturated USB endpoint: overflow is dropped.
        let _ = self.frames.push((bus, *message, received_at_ms));
    }

    fn forward_diagnostic(&mut self, bus: u8, rendered: &str) {
        let mut text = String::new();
        let _ = text.push_str(rendered);
        let _ = self.diagnostics.push((bus, text));
    }
}

//==================================================================================LOG

/// Log sink that keeps the emitted lines.
#[derive(Default)]
pub struct BufferLog {
    pub lines: Vec<String<MAX_LOG_LINE>, 16>,
}

impl LogSink for BufferLog {
    fn write_line(&mut self, line: &str) {
        let mut owned = String::new();
        let _ = owned.push_str(line);
        let _ = self.lines.push(owned);
    }
}

//==================================================================================PLATFORM

/// Loopback platform: `bus_count` in-memory buses, manual clock, capturing
/// pipeline and log.
pub struct LoopbackPlatform {
    bus_count: usize,
    echo: bool,
    bitrate: Bitrate,
}

impl LoopbackPlatform {
    pub fn new(bus_count: usize) -> Self {
        Self {
            bus_count: bus_count.min(MAX_BUSES),
            echo: false,
            bitrate: Bitrate::Rate500Kbps,
        }
    }

    /// Enable wire loopback on every bus.
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn with_bitrate(mut self, bitrate: Bitrate) -> Self {
        self.bitrate = bitrate;
        self
    }
}

impl Platform for LoopbackPlatform {
    type Bus = LoopbackBus;
    type Clock = ManualClock;
    type Pipeline = BufferPipeline;
    type Log = BufferLog;
    type Error = TransmitError<Infallible>;

    fn initialize(self) -> Result<PlatformParts<Self>, Self::Error> {
        let mut buses: Vec<LoopbackBus, MAX_BUSES> = Vec::new();
        for _ in 0..self.bus_count {
            let mut bus = LoopbackBus::new();
            bus.initialize(self.bitrate)?;
            bus.set_echo(self.echo);
            // bus_count is clamped to MAX_BUSES in the constructor.
            let _ = buses.push(bus);
        }
        Ok(PlatformParts {
            buses,
            clock: ManualClock::new(),
            pipeline: BufferPipeline::default(),
            log: BufferLog::default(),
        })
    }
}
