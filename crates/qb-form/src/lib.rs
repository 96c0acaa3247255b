//! # qb-form
//!
//! Struct-to-HTML-form marshaling for Quotebook.
//!
//! This crate provides:
//! - `Schema` / `FormRecord`: explicit, per-field form metadata declared next to
//!   a record type (label, widget, help text, validators, visibility)
//! - `reflect`: resolves a record's schema into an ordered `FieldDescriptor` list
//! - `Encoder`: renders a record as form markup through a pluggable `Decorator`
//! - `Decoder`: rebuilds a fresh record from submitted values, running validators
//!   and collecting per-field errors
//! - `ValidatorRegistry`: named validators, populated once at startup
//!
//! ## Usage
//!
//! ```
//! use qb_form::{BootstrapDecorator, Decoder, Encoder, Field, FormRecord, FormValues, Schema,
//!     ValidatorRegistry};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! impl FormRecord for Greeting {
//!     fn schema() -> Schema<Self> {
//!         Schema::builder()
//!             .field(
//!                 Field::new("Name", |g: &Greeting| &g.name, |g: &mut Greeting, v| g.name = v)
//!                     .label("Your name")
//!                     .validator("required"),
//!             )
//!             .build()
//!     }
//! }
//!
//! let registry = ValidatorRegistry::with_builtins();
//! let markup = Encoder::new(&registry, &BootstrapDecorator)
//!     .encode(&Greeting::default())
//!     .unwrap();
//! assert!(markup.as_str().contains(r#"name="Name""#));
//!
//! let decoded = Decoder::new(&registry)
//!     .decode::<Greeting>(&FormValues::parse("Name=Ada"))
//!     .unwrap();
//! assert!(decoded.is_ok());
//! assert_eq!(decoded.record.name, "Ada");
//! ```

mod decode;
mod decorator;
mod encode;
mod error;
mod markup;
mod scalar;
mod schema;
mod validator;
mod values;

pub use decode::{Decoded, Decoder, INVALID_VALUE};
pub use decorator::{BootstrapDecorator, Decorator, FieldView, PlainDecorator, control};
pub use encode::{CSRF_FIELD, Encoder};
pub use error::SchemaError;
pub use markup::{Element, Markup, MarkupWriter, escape_html};
pub use scalar::{FieldValue, ParseScalarError, Password, Scalar, ScalarKind};
pub use schema::{
    FIELD_PATH_SEPARATOR, Field, FieldDescriptor, FormRecord, Schema, SchemaBuilder, WidgetKind,
    reflect,
};
pub use validator::{REQUIRED, ValidationResult, Validator, ValidatorRegistry};
pub use values::{FieldErrors, FormValues};
