//! Firmware dispatch loop.
//!
//! [`Bridge::boot`] is the `Booting` state: it runs platform bootstrap
//! exactly once (the platform value is consumed, so it cannot run again) and
//! returns the bridge in its `Running` state. From then on the firmware
//! calls [`Bridge::run_once`] forever, or [`Bridge::run`], which does the
//! calling. Each iteration polls every bus for at most one frame, routes it,
//! ages the outstanding diagnostic requests, drains the outbound queue, and
//! returns so watchdog and interrupt servicing get the CPU back. Nothing in
//! here blocks; every "not yet" is expressed as a return checked again next
//! iteration.
use heapless::{Deque, Vec};

use crate::{
    debug_log,
    diagnostic::{formatter::MAX_RENDERED_LEN, DiagnosticRequest, DiagnosticResponse, RequestTable},
    error::{BootError, DispatchError, TransmitError},
    infra::log::Logger,
    platform::{Platform, MAX_BUSES},
    transport::{
        can_frame::CanMessage,
        traits::{bridge_clock::BridgeClock, can_bus::CanBus, host_pipeline::HostPipeline},
    },
};

/// One frame waiting for bus time, tagged with its target bus.
#[derive(Clone, Copy, Debug)]
pub struct OutboundFrame {
    pub bus: u8,
    pub message: CanMessage,
}

/// The steady-state control structure owning every hardware handle.
///
/// `REQ` bounds the outstanding diagnostic requests, `TX` the outbound frame
/// queue.
pub struct Bridge<P: Platform, const REQ: usize = 8, const TX: usize = 16> {
    buses: Vec<P::Bus, MAX_BUSES>,
    clock: P::Clock,
    pipeline: P::Pipeline,
    log: Logger<P::Log>,
    requests: RequestTable<REQ>,
    outbound: Deque<OutboundFrame, TX>,
    iterations: u32,
}

impl<P: Platform, const REQ: usize, const TX: usize> Bridge<P, REQ, TX> {
    /// Run platform bootstrap and enter the `Running` state.
    pub fn boot(platform: P) -> Result<Self, BootError<P::Error>> {
        let parts = platform.initialize().map_err(BootError::Platform)?;
        let mut bridge = Self {
            buses: parts.buses,
            clock: parts.clock,
            pipeline: parts.pipeline,
            log: Logger::new(parts.log),
            requests: RequestTable::new(),
            outbound: Deque::new(),
            iterations: 0,
        };
        debug_log!(
            bridge.log,
            "bridge up: {} bus(es)",
            bridge.buses.len()
        );
        Ok(bridge)
    }

    /// One cooperative loop iteration. Always returns.
    pub fn run_once(&mut self) {
        self.service_receive();
        self.expire_requests();
        self.drain_outbound();
        self.iterations = self.iterations.wrapping_add(1);
    }

    /// Loop forever. Barring power loss or a watchdog reset, this never
    /// returns.
    pub fn run(mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    /// Queue a frame for transmission on `bus`. Sent by the loop, oldest
    /// first, as bus time allows.
    pub fn queue_frame(&mut self, bus: u8, message: CanMessage) -> Result<(), DispatchError> {
        if bus as usize >= self.buses.len() {
            return Err(DispatchError::UnknownBus { bus });
        }
        self.outbound
            .push_back(OutboundFrame { bus, message })
            .map_err(|_| DispatchError::TransmitQueueFull)
    }

    /// Register a diagnostic request and queue its query frame.
    ///
    /// The request is stamped with the current clock. If one with the same
    /// (bus, key) is already outstanding it is replaced; a reply will only
    /// ever satisfy the newer one.
    pub fn issue_request(
        &mut self,
        mut request: DiagnosticRequest,
        query: CanMessage,
    ) -> Result<(), DispatchError> {
        let bus = request.bus;
        if bus as usize >= self.buses.len() {
            return Err(DispatchError::UnknownBus { bus });
        }
        if self.outbound.is_full() {
            return Err(DispatchError::TransmitQueueFull);
        }

        request.issued_at_ms = self.clock.now_ms();
        if let Some(prior) = self.requests.insert(request)? {
            debug_log!(
                self.log,
                "replacing outstanding request: bus {} key 0x{:02X}",
                prior.bus,
                prior.key
            );
        }
        // Queue capacity checked above.
        let _ = self.outbound.push_back(OutboundFrame {
            bus,
            message: query,
        });
        Ok(())
    }

    //==============================================================================LOOP_STEPS

    /// Step 1: at most one frame per bus, diagnostic match first, then the
    /// general translation path. A reply can double as a normal signal
    /// frame, so matched frames are forwarded too. Receive-side overflow is
    /// reported here, from loop context, never from the interrupt handler.
    fn service_receive(&mut self) {
        for bus_index in 0..self.buses.len() {
            let bus = bus_index as u8;
            let dropped = self.buses[bus_index].take_dropped();
            if dropped > 0 {
                debug_log!(
                    self.log,
                    "receive overflow on bus {}: {} frame(s) dropped",
                    bus,
                    dropped
                );
            }

            let Some(frame) = self.buses[bus_index].poll() else {
                continue;
            };
            let received_at = self.clock.now_ms();

            if let Some(request) = self.requests.take_match(bus, &frame) {
                let response = DiagnosticResponse::from_match(&request, &frame);
                let mut buf = [0u8; MAX_RENDERED_LEN];
                let rendered = response.render(&mut buf);
                self.pipeline.forward_diagnostic(bus, rendered);
            }

            self.pipeline.forward_frame(bus, &frame, received_at);
        }
    }

    /// Step 2: age out unanswered requests. Timeouts are reported, never
    /// retried here; retry is the caller's decision.
    fn expire_requests(&mut self) {
        let now = self.clock.now_ms();
        let log = &mut self.log;
        self.requests.expire(now, |request| {
            debug_log!(
                log,
                "diagnostic timeout: bus {} key 0x{:02X}",
                request.bus,
                request.key
            );
        });
    }

    /// Step 3: push queued frames out. A full hardware buffer stops the
    /// drain for this iteration with the frame requeued at the front, so
    /// transmit order is preserved.
    fn drain_outbound(&mut self) {
        while let Some(outbound) = self.outbound.pop_front() {
            match self.buses[outbound.bus as usize].send(&outbound.message) {
                Ok(()) => {}
                Err(TransmitError::BufferFull) => {
                    let _ = self.outbound.push_front(outbound);
                    break;
                }
                Err(err) => {
                    // NotInitialized or a driver fault: ordering bug or dead
                    // controller. Drop the frame, keep the loop alive.
                    debug_log!(
                        self.log,
                        "send failed on bus {}: {:?}",
                        outbound.bus,
                        err
                    );
                }
            }
        }
    }

    //==============================================================================ACCESSORS

    /// Completed loop iterations since boot (wrapping). Lets harnesses
    /// verify the loop keeps yielding.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Outstanding diagnostic requests.
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Frames still waiting for bus time.
    pub fn queued_frames(&self) -> usize {
        self.outbound.len()
    }

    pub fn bus(&self, bus: u8) -> Option<&P::Bus> {
        self.buses.get(bus as usize)
    }

    pub fn bus_mut(&mut self, bus: u8) -> Option<&mut P::Bus> {
        self.buses.get_mut(bus as usize)
    }

    pub fn clock(&self) -> &P::Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut P::Clock {
        &mut self.clock
    }

    pub fn pipeline(&self) -> &P::Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P::Pipeline {
        &mut self.pipeline
    }

    pub fn logger_mut(&mut self) -> &mut Logger<P::Log> {
        &mut self.log
    }
}
