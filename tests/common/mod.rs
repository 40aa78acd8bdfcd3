//! Shared test utilities for vigil integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The fakes are handle-style: cloning shares the same
//! underlying state, so a test can hand a clone to the pipeline and keep one
//! for assertions.

pub mod assertions;
pub mod builders;
pub mod fakes;
pub mod fixtures;

pub use builders::*;
pub use fakes::*;
pub use fixtures::*;
