//! Request/response correlation for point-to-point diagnostics (OBD-II
//! style) layered over the broadcast bus.
//!
//! A [`DiagnosticRequest`] pairs the CAN identifier the reply will carry with
//! a correlation key (the mode/PID echo byte of the reply payload) and a
//! caller-supplied pure decode function turning raw bytes into a physical
//! value. The [`RequestTable`] holds the outstanding requests, enforces the
//! one-request-per-(bus, key) rule, and ages them out.
use embedded_can::Id;
use heapless::Vec;

use crate::{
    error::DiagnosticError,
    transport::{can_frame::CanMessage, traits::bridge_clock::elapsed_ms},
};

pub mod formatter;

/// Payload byte a reply echoes its request's key in. For OBD-II single
/// frames: byte 0 is the length, byte 1 the mode + 0x40, byte 2 the PID.
pub const CORRELATION_BYTE: usize = 2;

/// Default age after which an unanswered request expires (ms).
///
/// An ECU that has the answer replies within a few frame times; half a second
/// covers slow gateways with margin while keeping the request table fresh.
pub const DEFAULT_DIAGNOSTIC_TIMEOUT_MS: u32 = 500;

/// Pure interpretation function: raw reply payload to physical value.
/// Per-signal scaling formulas live with the caller, not in this crate.
pub type DecodeFn = fn(payload: &[u8]) -> f32;

//==================================================================================REQUEST

/// An outstanding diagnostic request awaiting its matching reply.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticRequest {
    /// Index of the bus the reply is expected on.
    pub bus: u8,
    /// Identifier the reply frame will carry (e.g. 0x7E8).
    pub response_id: Id,
    /// Correlation key matched against the reply's [`CORRELATION_BYTE`].
    pub key: u8,
    /// Bridge clock time at which the request frame was queued. Stamped by
    /// the dispatch loop when the request is admitted.
    pub issued_at_ms: u32,
    /// Age after which the request expires unanswered.
    pub timeout_ms: u32,
    /// Decode function applied to the matching reply payload.
    pub decode: DecodeFn,
    /// Unit suffix for the rendered value (may be empty).
    pub unit: &'static str,
}

impl DiagnosticRequest {
    /// Request with the default timeout; `issued_at_ms` is stamped on admission.
    pub fn new(bus: u8, response_id: Id, key: u8, decode: DecodeFn, unit: &'static str) -> Self {
        Self {
            bus,
            response_id,
            key,
            issued_at_ms: 0,
            timeout_ms: DEFAULT_DIAGNOSTIC_TIMEOUT_MS,
            decode,
            unit,
        }
    }

    /// Override the expiry timeout.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Whether `frame`, received on `bus`, answers this request.
    pub fn matches(&self, bus: u8, frame: &CanMessage) -> bool {
        self.bus == bus
            && self.response_id == frame.id()
            && frame.len() > CORRELATION_BYTE
            && frame.payload()[CORRELATION_BYTE] == self.key
    }
}

//==================================================================================RESPONSE

/// Decoded view of a reply matched to a request. Transient: built, rendered,
/// forwarded, discarded.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticResponse {
    /// The raw reply frame.
    pub raw: CanMessage,
    /// Physical value produced by the request's decode function.
    pub value: f32,
    /// Unit suffix carried over from the request.
    pub unit: &'static str,
}

impl DiagnosticResponse {
    /// Apply the request's decode function to a matched reply.
    pub fn from_match(request: &DiagnosticRequest, frame: &CanMessage) -> Self {
        Self {
            raw: *frame,
            value: (request.decode)(frame.payload()),
            unit: request.unit,
        }
    }
}

//==================================================================================TABLE

/// Fixed-capacity set of outstanding requests.
///
/// Invariant: at most one entry per (bus, key). Inserting a duplicate
/// replaces the prior entry, so one incoming reply can never satisfy two
/// requests.
pub struct RequestTable<const N: usize> {
    entries: Vec<DiagnosticRequest, N>,
}

impl<const N: usize> RequestTable<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, bus: u8, key: u8) -> bool {
        self.entries.iter().any(|e| e.bus == bus && e.key == key)
    }

    /// Admit a request, replacing any outstanding one with the same
    /// (bus, key). Returns the replaced request, if any.
    pub fn insert(
        &mut self,
        request: DiagnosticRequest,
    ) -> Result<Option<DiagnosticRequest>, DiagnosticError> {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.bus == request.bus && e.key == request.key)
        {
            let prior = self.entries[pos];
            self.entries[pos] = request;
            return Ok(Some(prior));
        }
        self.entries
            .push(request)
            .map_err(|_| DiagnosticError::TableFull)?;
        Ok(None)
    }

    /// Remove and return the first request answered by `frame` on `bus`.
    pub fn take_match(&mut self, bus: u8, frame: &CanMessage) -> Option<DiagnosticRequest> {
        let pos = self.entries.iter().position(|e| e.matches(bus, frame))?;
        Some(self.entries.swap_remove(pos))
    }

    /// Sweep out requests whose age reached their timeout, invoking
    /// `on_expired` for each so the loop can report the timeout. Expired
    /// requests can never match a late reply.
    pub fn expire<F: FnMut(&DiagnosticRequest)>(&mut self, now_ms: u32, mut on_expired: F) {
        let mut i = 0;
        while i < self.entries.len() {
            let age = elapsed_ms(now_ms, self.entries[i].issued_at_ms);
            if age >= self.entries[i].timeout_ms {
                let expired = self.entries.swap_remove(i);
                on_expired(&expired);
            } else {
                i += 1;
            }
        }
    }
}

impl<const N: usize> Default for RequestTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
