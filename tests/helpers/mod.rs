//! Shared OBD-II style fixtures: request/reply frame builders and a few
//! well-known PID decoders for exercising the bridge.
#![allow(dead_code)]

use canbridge::transport::can_frame::CanMessage;
use embedded_can::{Id, StandardId};

/// Functional broadcast request identifier.
pub const PID_REQUEST: u16 = 0x7DF;
/// First ECU reply identifier.
pub const PID_REPLY: u16 = 0x7E8;

pub const ENGINE_COOLANT_TEMP: u8 = 0x05;
pub const ENGINE_RPM: u8 = 0x0C;
pub const VEHICLE_SPEED: u8 = 0x0D;

pub fn std_id(raw: u16) -> Id {
    Id::Standard(StandardId::new(raw).unwrap())
}

/// Mode 0x01 request frame for `pid`.
pub fn obd_query(pid: u8) -> CanMessage {
    CanMessage::new(
        std_id(PID_REQUEST),
        &[0x02, 0x01, pid, 0x00, 0x00, 0x00, 0x00, 0x00],
    )
    .unwrap()
}

/// Single-frame mode 0x01 reply carrying data bytes `a` and `b`.
pub fn obd_reply(pid: u8, a: u8, b: u8) -> CanMessage {
    CanMessage::new(
        std_id(PID_REPLY),
        &[0x04, 0x41, pid, a, b, 0x00, 0x00, 0x00],
    )
    .unwrap()
}

/// ((A*256)+B)/4 [rpm]
pub fn decode_rpm(payload: &[u8]) -> f32 {
    (payload[3] as u16 as f32 * 256.0 + payload[4] as f32) / 4.0
}

/// A-40 [degC]
pub fn decode_coolant_temp(payload: &[u8]) -> f32 {
    payload[3] as f32 - 40.0
}

/// A [km/h]
pub fn decode_vehicle_speed(payload: &[u8]) -> f32 {
    payload[3] as f32
}
