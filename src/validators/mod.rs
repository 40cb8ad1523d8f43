//! Validator module.
//!
//! Contains the validator registry and built-in validator implementations.

pub mod builtin;
pub mod registry;

pub use registry::{Registry, RegistryBuilder, TypeChecker, ValidatorFactory, DEFAULT_REGISTRY};
