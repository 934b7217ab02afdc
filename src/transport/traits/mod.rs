//! Abstraction traits the target hardware implements (CAN bus, clock, and
//! host-facing pipeline).
pub mod bridge_clock;
pub mod can_bus;
pub mod host_pipeline;
