//! Collection aliases tuned for simplex tree storage and scratch buffers.

mod aliases;

pub use aliases::*;
