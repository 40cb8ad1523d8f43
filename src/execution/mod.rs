//! Execution module.
//!
//! Compiles specs into checks and runs them under a policy.

pub mod check;
pub mod compiler;
pub mod policy;

pub use check::{CheckFuture, CompiledCheck};
pub use compiler::{compile, compile_value};
pub use policy::{all, all_blocking, ok, ok_blocking};
