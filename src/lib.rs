#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod arithmetic;
pub mod config;
pub mod device;
pub mod prelude;
pub mod quantity;
pub mod snapshot;
pub mod summary;
pub mod tables;

pub use crate::{
    config::{Configuration, DeviceAttributes},
    device::DeviceId,
    snapshot::{DeviceReading, RawSnapshot},
    summary::Summary,
};

/// Derive the power balance summary from the current data.
pub fn compute_summary(snapshot: &RawSnapshot, configuration: &Configuration) -> Summary {
    Summary::compute(snapshot, configuration)
}
