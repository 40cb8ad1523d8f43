//! Validator registry for resolving spec keys.

use crate::core::error::{CheckResult, SpecResult};
use crate::core::error_log::Log;
use crate::core::spec::Spec;
use crate::core::types::Value;
use crate::execution::check::CompiledCheck;
use crate::execution::compiler;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Factory turning a spec argument into an executable check.
///
/// Factories receive the registry so they can compile nested specs.
pub type ValidatorFactory =
    Arc<dyn Fn(&Value, &Registry) -> SpecResult<CompiledCheck> + Send + Sync>;

/// Leaf checker validating or coercing one kind of value.
pub type TypeChecker = Arc<dyn Fn(Value, &Log) -> CheckResult + Send + Sync>;

/// Registry shared by callers that do not need custom validators.
///
/// Built once, on first use, and never mutated.
pub static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(Registry::with_builtins);

/// Registry of validator factories and leaf type checkers.
///
/// Both tables keep registration order, so listings are stable.
#[derive(Clone)]
pub struct Registry {
    /// Validator factories indexed by spec key.
    validators: IndexMap<String, ValidatorFactory>,
    /// Leaf checkers indexed by type name (used by the `type` validator).
    types: IndexMap<String, TypeChecker>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            validators: IndexMap::new(),
            types: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in validators and types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        crate::validators::builtin::register_all(&mut registry);

        registry
    }

    /// Register a validator factory under a spec key.
    ///
    /// Replaces any factory already registered under that key.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value, &Registry) -> SpecResult<CompiledCheck> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("registering validator '{}'", name);
        self.validators.insert(name, Arc::new(factory));
    }

    /// Register a leaf type checker under a type name.
    pub fn register_type<F>(&mut self, name: impl Into<String>, checker: F)
    where
        F: Fn(Value, &Log) -> CheckResult + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("registering type '{}'", name);
        self.types.insert(name, Arc::new(checker));
    }

    /// Get the factory registered under a spec key.
    pub fn factory(&self, name: &str) -> Option<&ValidatorFactory> {
        self.validators.get(name)
    }

    /// Get the leaf checker registered under a type name.
    pub fn type_checker(&self, name: &str) -> Option<&TypeChecker> {
        self.types.get(name)
    }

    /// Check if a validator is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Check if a type is registered.
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Get all registered validator names.
    pub fn validator_names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(|s| s.as_str())
    }

    /// Get all registered type names.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|s| s.as_str())
    }

    /// Unregister a validator.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.validators.shift_remove(name).is_some()
    }

    /// Unregister a type.
    pub fn unregister_type(&mut self, name: &str) -> bool {
        self.types.shift_remove(name).is_some()
    }

    /// Get the total number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if registry has no validators.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Compile a spec against this registry.
    pub fn compile(&self, spec: &Spec) -> SpecResult<CompiledCheck> {
        compiler::compile(spec, self)
    }

    /// Parse and compile a spec value against this registry.
    pub fn compile_value(&self, spec: &Value) -> SpecResult<CompiledCheck> {
        compiler::compile_value(spec, self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for creating a customized registry.
pub struct RegistryBuilder {
    registry: Registry,
    include_builtins: bool,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            include_builtins: true,
        }
    }

    /// Include or exclude built-in validators and types.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Register a custom validator.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value, &Registry) -> SpecResult<CompiledCheck> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    /// Register a custom leaf type.
    pub fn register_type<F>(mut self, name: impl Into<String>, checker: F) -> Self
    where
        F: Fn(Value, &Log) -> CheckResult + Send + Sync + 'static,
    {
        self.registry.register_type(name, checker);
        self
    }

    /// Build the registry.
    ///
    /// Custom registrations win over built-ins with the same name.
    pub fn build(self) -> Registry {
        if !self.include_builtins {
            return self.registry;
        }

        let mut registry = Registry::with_builtins();
        for (name, factory) in self.registry.validators {
            registry.validators.insert(name, factory);
        }
        for (name, checker) in self.registry.types {
            registry.types.insert(name, checker);
        }
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
