//! In-memory representation of one CAN frame as it crosses the bridge.
use embedded_can::{Frame, Id};

use crate::{error::FrameError, transport::MAX_CAN_PAYLOAD};

/// Immutable value for one bus transmission unit: identifier plus payload.
///
/// Constructed by the sender right before transmission or by the receiver
/// right after reception; a payload length above eight bytes is rejected at
/// construction, so a malformed frame is unrepresentable past the wire
/// boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanMessage {
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    id: Id,
    data: [u8; MAX_CAN_PAYLOAD],
    len: usize,
}

impl CanMessage {
    /// Build a frame, validating the payload length.
    pub fn new(id: impl Into<Id>, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_CAN_PAYLOAD {
            return Err(FrameError::InvalidLength {
                len: payload.len(),
            });
        }
        let mut data = [0u8; MAX_CAN_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id: id.into(),
            data,
            len: payload.len(),
        })
    }

    /// Frame identifier (standard or extended).
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw identifier bits, useful for compact logging.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }
}

/// The bridge only carries data frames; remote frames are not part of the
/// translation path and `new_remote` refuses to build one.
impl Frame for CanMessage {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        CanMessage::new(id, data).ok()
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.len]
    }
}
