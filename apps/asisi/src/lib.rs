//! # asisi
//!
//! Application layer of the ASISI stress index: configuration, batch input
//! and report rendering around `asisi-core`.

pub mod config;
pub mod input;
pub mod report;
