//! # rp_gen
//!
//! A userspace driver for the Red Pitaya arbitrary signal generator (ASG) FPGA core and the linear
//! stage that scales and offsets its output. The register window is memory-mapped from a device
//! node and every setting is translated between engineering units and the fixed-point words the
//! hardware expects.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod consts;
pub mod core;
pub mod generator;
pub mod prelude;
pub mod transport;
