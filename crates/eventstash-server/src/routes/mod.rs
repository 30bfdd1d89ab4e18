//! # Route Modules

pub mod events;
pub mod stats;
