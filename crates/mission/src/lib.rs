//! Lidar mission model crate: energy budget, swath, and constellation sizing,
//! plus the trade studies built on top of it.

pub mod model;
pub mod noise;
pub mod sweep;
pub mod technology;

pub use facade::*;

mod facade;
