//! Validators used by the quote forms.

use qb_form::{FieldValue, ValidationResult, Validator, ValidatorRegistry};

/// Registry name of the shared-password check.
pub const PASSWORD: &str = "password";

/// Shown next to the password field when it does not match.
pub const INCORRECT_PASSWORD: &str = "The password is incorrect.";

/// A validator accepting only `secret`.
///
/// The secret is captured here rather than read from global state.
pub fn password_validator(secret: impl Into<String>) -> impl Validator + 'static {
    let secret = secret.into();
    move |value: &FieldValue| {
        if value.as_str() == Some(secret.as_str()) {
            ValidationResult::Accepted
        } else {
            ValidationResult::reject(INCORRECT_PASSWORD)
        }
    }
}

/// Register the quote validators on `registry`.
pub fn register_validators(registry: &mut ValidatorRegistry, secret: &str) {
    registry.register(PASSWORD, password_validator(secret));
}

/// A registry with the built-in validators and the quote validators.
#[must_use]
pub fn validator_registry(secret: &str) -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::with_builtins();
    register_validators(&mut registry, secret);
    registry
}
