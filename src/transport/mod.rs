//! CAN transport layer: frame representation, the interrupt-to-loop receive
//! queue, and the hardware abstraction traits a target must implement.
pub mod can_frame;
pub mod queue;
pub mod traits;

/// Classic CAN payload limit in bytes.
pub const MAX_CAN_PAYLOAD: usize = 8;
