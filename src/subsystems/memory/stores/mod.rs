//! Built-in transcript store backends.

pub mod in_memory;
