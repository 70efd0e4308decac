//! Adapters for the domain ports: the Square HTTP source, GPIO actuators and
//! in-memory doubles.

pub mod gpio;
pub mod in_memory;
pub mod square;
