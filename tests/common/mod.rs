//! Common test utilities for gplot.
//!
//! Synthetic global fields and floating-point assertions shared by the
//! integration tests.

pub mod assertions;
pub mod fields;
