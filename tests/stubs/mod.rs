#![allow(dead_code)]
// Each test binary uses a different subset of the stubs

pub mod bus;
pub mod events;
pub mod logger;
