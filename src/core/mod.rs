//! # Core Module
//!
//! GPU context management, frame timing and object ids.

mod clock;
mod context;
mod id;

pub use clock::Clock;
pub use context::{Context, ContextError};
pub use id::BlobId;
