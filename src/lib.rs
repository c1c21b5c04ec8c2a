//! EdgeX message bus source for stream pipelines
//!
//! Subscribes to the EdgeX message bus, decodes each event frame and hands
//! its readings downstream as a [`SourceTuple`](data_mgmt::SourceTuple).
pub mod constants;
pub mod data_mgmt;
pub mod helpers;
pub mod interfaces;
pub mod source;
