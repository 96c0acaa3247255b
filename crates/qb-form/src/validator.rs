//! Named field validators.
//!
//! Validators are registered by name once, while the application starts up,
//! and are looked up through the `validators` listed on each
//! [`FieldDescriptor`](crate::FieldDescriptor). After start-up the registry is
//! only read, so it can be shared behind an `Arc` without locking.

use std::collections::HashMap;
use std::fmt;

use crate::scalar::FieldValue;

/// Name of the built-in non-empty validator.
pub const REQUIRED: &str = "required";

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    /// Rejected, with a message meant for the person filling in the form.
    Rejected(String),
}

impl ValidationResult {
    #[must_use]
    pub fn reject(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A predicate over a converted field value.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &FieldValue) -> ValidationResult;
}

impl<F> Validator for F
where
    F: Fn(&FieldValue) -> ValidationResult + Send + Sync,
{
    fn validate(&self, value: &FieldValue) -> ValidationResult {
        self(value)
    }
}

/// Table of validators keyed by name.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in validators (`required`).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(REQUIRED, required);
        registry
    }

    /// Register `validator` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, validator: impl Validator + 'static) -> &mut Self {
        let name = name.into();
        if self.validators.contains_key(&name) {
            tracing::warn!(validator = %name, "replacing previously registered validator");
        }
        self.validators.insert(name, Box::new(validator));
        self
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&dyn Validator> {
        self.validators.get(name).map(|validator| &**validator)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}

fn required(value: &FieldValue) -> ValidationResult {
    match value.as_str() {
        Some(text) if text.trim().is_empty() => ValidationResult::reject("This field is required."),
        _ => ValidationResult::Accepted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Password;

    #[test]
    fn builtins_include_required() {
        let registry = ValidatorRegistry::with_builtins();
        assert_eq!(registry.names(), vec![REQUIRED]);
    }

    #[test]
    fn required_rejects_blank_text_and_passwords() {
        let registry = ValidatorRegistry::with_builtins();
        let required = registry.lookup(REQUIRED).expect("builtin registered");

        assert!(!required.validate(&FieldValue::Text("  ".into())).is_accepted());
        assert!(!required.validate(&FieldValue::Password(Password::default())).is_accepted());
        assert!(required.validate(&FieldValue::Text("x".into())).is_accepted());
        assert!(required.validate(&FieldValue::Integer(0)).is_accepted());
    }

    #[test]
    fn closures_register_as_validators() {
        let mut registry = ValidatorRegistry::new();
        registry.register("even", |value: &FieldValue| match value {
            FieldValue::Integer(n) if n % 2 != 0 => ValidationResult::reject("must be even"),
            _ => ValidationResult::Accepted,
        });

        let even = registry.lookup("even").unwrap();
        assert_eq!(
            even.validate(&FieldValue::Integer(3)),
            ValidationResult::Rejected("must be even".into())
        );
        assert!(even.validate(&FieldValue::Integer(4)).is_accepted());
        assert!(registry.lookup("odd").is_none());
    }

    #[test]
    fn registering_twice_replaces() {
        let mut registry = ValidatorRegistry::new();
        registry
            .register("gate", |_: &FieldValue| ValidationResult::reject("closed"))
            .register("gate", |_: &FieldValue| ValidationResult::Accepted);

        assert!(registry.lookup("gate").unwrap().validate(&FieldValue::Boolean(true)).is_accepted());
        assert_eq!(registry.names().len(), 1);
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidatorRegistry>();
    }
}
