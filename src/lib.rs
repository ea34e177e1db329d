//! Ringside - headless boxing bout simulation
//!
//! Scripted and human-controlled fighters, adaptive AI and round/KO/decision
//! scoring, advanced by a host loop one delta-time at a time.

pub mod bout;
pub mod core;
