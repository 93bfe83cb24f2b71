//! Test utilities: grid assertions and a frame-by-frame view harness.

/// Buffer testing utilities.
pub mod buf;
/// Harness for view testing.
pub mod harness;

pub use buf::BufTest;
pub use harness::Harness;
