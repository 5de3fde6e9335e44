//! Error types for the stepgate protocol layer.

mod channel;
mod engine;
mod identity;

pub use channel::*;
pub use engine::*;
pub use identity::*;
