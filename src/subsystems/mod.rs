//! Subsystem modules for the relay.

pub mod comms;
pub mod memory;
pub mod relay;
pub mod runtime;
