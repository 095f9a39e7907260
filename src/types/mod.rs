//! Core types for unillm.

pub mod delta;
pub mod generation;
pub mod message;
pub mod part;
pub mod response;
pub mod usage;

pub use delta::*;
pub use generation::*;
pub use message::*;
pub use part::*;
pub use response::*;
pub use usage::*;
