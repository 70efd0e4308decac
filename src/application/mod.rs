//! Application layer: the polling driver.
//!
//! `PaymentTracker` ties the ports together and owns the tracker state. Ticks
//! are strictly sequential; the state has a single writer.

pub mod tracker;
