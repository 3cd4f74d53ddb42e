//! Command implementations.

pub mod archive;
pub mod extract;
pub mod menu;
