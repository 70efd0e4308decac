//! Domain layer: payment snapshots, the transition detector, the status
//! classifier and the ports the tracker drives.

pub mod action;
pub mod ports;
pub mod report;
pub mod tracker;
pub mod transaction;
