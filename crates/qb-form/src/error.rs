//! Schema configuration errors.

use thiserror::Error;

/// Structural misconfiguration of a form schema.
///
/// These are never caused by user input. A schema that produces one is broken
/// for every request, so callers should refuse to serve the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field names a validator that is not in the registry.
    #[error("field '{field}' uses unregistered validator '{validator}'")]
    UnknownValidator { field: String, validator: String },

    /// Two fields resolve to the same identifier after flattening.
    #[error("duplicate form field identifier '{0}'")]
    DuplicateField(String),

    /// A field uses an identifier the encoder reserves for itself.
    #[error("form field identifier '{0}' is reserved")]
    ReservedField(String),
}
