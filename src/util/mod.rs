//! Utility modules: binary fragment handling, usage tracking.

pub mod binary;
pub mod usage;
