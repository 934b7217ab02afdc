//! Cross-cutting infrastructure: bounded text formatting and the debug
//! logging facade.
pub mod fmt;
pub mod log;
