//! Archive extraction module.

pub mod zip;
