//! Submitted values → record.

use crate::error::SchemaError;
use crate::scalar::FieldValue;
use crate::schema::{FieldDescriptor, FormRecord};
use crate::validator::{ValidationResult, ValidatorRegistry};
use crate::values::{FieldErrors, FormValues};

/// Message recorded when a submitted string cannot be converted.
pub const INVALID_VALUE: &str = "invalid value";

/// A decoded record together with the errors found while decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub record: T,
    pub errors: FieldErrors,
}

impl<T> Decoded<T> {
    /// `true` if no field produced an error.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Rebuilds records from submitted form values.
///
/// User mistakes never fail a decode: missing keys read as empty strings, and
/// unconvertible or rejected values become entries in [`Decoded::errors`].
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    registry: &'a ValidatorRegistry,
    value_on_validation_error: bool,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub const fn new(registry: &'a ValidatorRegistry) -> Self {
        Self {
            registry,
            value_on_validation_error: true,
        }
    }

    /// Keep a value that a validator rejected in the decoded record, so the
    /// form can be shown again with the user's input. Defaults to `true`;
    /// when `false` the field is reset to its zero value.
    #[must_use]
    pub const fn value_on_validation_error(mut self, keep: bool) -> Self {
        self.value_on_validation_error = keep;
        self
    }

    /// Decode a fresh `T` from `values`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` only if the schema of `T` is misconfigured.
    pub fn decode<T: FormRecord>(&self, values: &FormValues) -> Result<Decoded<T>, SchemaError> {
        let schema = T::schema();
        let descriptors = schema.resolve(self.registry)?;
        let mut record = T::default();
        let mut errors = FieldErrors::new();

        for (field, descriptor) in schema.fields().iter().zip(&descriptors) {
            if !descriptor.visible {
                continue;
            }
            let raw = values.get(&descriptor.name).unwrap_or_default();

            let value = match field.assign(&mut record, raw) {
                Ok(value) => value,
                Err(error) => {
                    tracing::debug!(field = %descriptor.name, %error, "form value conversion failed");
                    field.reset(&mut record);
                    errors.insert(descriptor.name.as_str(), INVALID_VALUE);
                    continue;
                }
            };

            if let Some(message) = self.first_rejection(descriptor, &value)? {
                tracing::debug!(field = %descriptor.name, "form value rejected by validator");
                if !self.value_on_validation_error {
                    field.reset(&mut record);
                }
                errors.insert(descriptor.name.as_str(), message);
            }
        }

        Ok(Decoded { record, errors })
    }

    /// Run the descriptor's validators in order, stopping at the first rejection.
    fn first_rejection(
        &self,
        descriptor: &FieldDescriptor,
        value: &FieldValue,
    ) -> Result<Option<String>, SchemaError> {
        for name in &descriptor.validators {
            let validator = self
                .registry
                .lookup(name)
                .ok_or_else(|| SchemaError::UnknownValidator {
                    field: descriptor.name.clone(),
                    validator: name.clone(),
                })?;
            if let ValidationResult::Rejected(message) = validator.validate(value) {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }
}
