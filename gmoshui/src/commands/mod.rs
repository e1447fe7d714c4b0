//! Command implementations for each subsystem

pub mod cache;
pub mod gma;
pub mod workshop;
