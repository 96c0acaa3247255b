//! Record → form markup.

use crate::decorator::{Decorator, FieldView};
use crate::error::SchemaError;
use crate::markup::{Markup, MarkupWriter};
use crate::schema::{FieldDescriptor, FormRecord, WidgetKind};
use crate::validator::ValidatorRegistry;
use crate::values::{FieldErrors, FormValues};

/// Name of the hidden input that carries the CSRF token.
pub const CSRF_FIELD: &str = "csrf_token";

/// Renders records as form markup.
///
/// Field order and identifiers match exactly what [`Decoder`](crate::Decoder)
/// reads back.
pub struct Encoder<'a> {
    registry: &'a ValidatorRegistry,
    decorator: &'a dyn Decorator,
    csrf_token: Option<String>,
    compact: bool,
    errors: Option<&'a FieldErrors>,
}

impl<'a> Encoder<'a> {
    #[must_use]
    pub fn new(registry: &'a ValidatorRegistry, decorator: &'a dyn Decorator) -> Self {
        Self {
            registry,
            decorator,
            csrf_token: None,
            compact: false,
            errors: None,
        }
    }

    /// Emit a hidden [`CSRF_FIELD`] input carrying `token`.
    #[must_use]
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Drop newlines and indentation between markup lines.
    #[must_use]
    pub const fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Annotate fields with the messages of a previous decode.
    #[must_use]
    pub const fn errors(mut self, errors: &'a FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Render `record` as form fields.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the schema of `T` is misconfigured.
    pub fn encode<T: FormRecord>(&self, record: &T) -> Result<Markup, SchemaError> {
        let schema = T::schema();
        let descriptors = schema.resolve(self.registry)?;
        let mut out = MarkupWriter::new(self.compact);

        if let Some(token) = &self.csrf_token {
            self.decorator.hidden(&mut out, CSRF_FIELD, token);
        }

        for (field, descriptor) in schema.fields().iter().zip(&descriptors) {
            if !descriptor.visible {
                continue;
            }
            let value = form_value(descriptor, field.render(record));

            if descriptor.widget == WidgetKind::Hidden {
                self.decorator.hidden(&mut out, &descriptor.name, &value);
                continue;
            }

            let view = FieldView {
                descriptor,
                value: &value,
                error: self.errors.and_then(|errors| errors.get(&descriptor.name)),
            };
            self.decorator.field(&mut out, &view);
        }

        Ok(out.finish())
    }

    /// The values a browser would submit for the encoded form, unchanged.
    ///
    /// Unchecked checkboxes are left out, as browsers do.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the schema of `T` is misconfigured.
    pub fn field_values<T: FormRecord>(&self, record: &T) -> Result<FormValues, SchemaError> {
        let schema = T::schema();
        let descriptors = schema.resolve(self.registry)?;
        let mut values = FormValues::new();

        if let Some(token) = &self.csrf_token {
            values.insert(CSRF_FIELD, token.as_str());
        }

        for (field, descriptor) in schema.fields().iter().zip(&descriptors) {
            if !descriptor.visible {
                continue;
            }
            let value = form_value(descriptor, field.render(record));
            if descriptor.widget == WidgetKind::Checkbox && value != "true" {
                continue;
            }
            values.insert(descriptor.name.as_str(), value);
        }

        Ok(values)
    }
}

/// Password inputs never echo their value.
fn form_value(descriptor: &FieldDescriptor, rendered: String) -> String {
    if descriptor.widget == WidgetKind::Password {
        String::new()
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::PlainDecorator;
    use crate::schema::{Field, Schema};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Login {
        id: i64,
        user: String,
        secret: crate::Password,
        remember: bool,
        notes: String,
    }

    impl FormRecord for Login {
        fn schema() -> Schema<Self> {
            Schema::builder()
                .field(
                    Field::new("Id", |l: &Login| &l.id, |l: &mut Login, v| l.id = v)
                        .widget(WidgetKind::Hidden),
                )
                .field(Field::new("User", |l: &Login| &l.user, |l: &mut Login, v| l.user = v))
                .field(Field::new("Secret", |l: &Login| &l.secret, |l: &mut Login, v| l.secret = v))
                .field(Field::new("Remember", |l: &Login| &l.remember, |l: &mut Login, v| {
                    l.remember = v;
                }))
                .field(
                    Field::new("Notes", |l: &Login| &l.notes, |l: &mut Login, v| l.notes = v)
                        .suppressed(),
                )
                .build()
        }
    }

    fn login() -> Login {
        Login {
            id: 7,
            user: "ada".into(),
            secret: "hunter2".into(),
            remember: false,
            notes: "internal".into(),
        }
    }

    #[test]
    fn encodes_visible_fields_in_order() {
        let registry = ValidatorRegistry::new();
        let html = Encoder::new(&registry, &PlainDecorator)
            .compact(true)
            .encode(&login())
            .unwrap();
        let html = html.as_str();

        let id = html.find(r#"name="Id""#).unwrap();
        let user = html.find(r#"name="User""#).unwrap();
        let secret = html.find(r#"name="Secret""#).unwrap();
        let remember = html.find(r#"name="Remember""#).unwrap();
        assert!(id < user && user < secret && secret < remember);

        assert!(html.starts_with(r#"<input type="hidden" name="Id" value="7">"#));
        assert!(!html.contains("Notes"));
        assert!(!html.contains("internal"));
        assert!(!html.contains("hunter2"));
    }

    #[test]
    fn csrf_token_is_injected_first() {
        let registry = ValidatorRegistry::new();
        let with_token = Encoder::new(&registry, &PlainDecorator)
            .csrf_token("abc123")
            .compact(true)
            .encode(&login())
            .unwrap();
        let without_token = Encoder::new(&registry, &PlainDecorator)
            .compact(true)
            .encode(&login())
            .unwrap();

        assert!(
            with_token
                .as_str()
                .starts_with(r#"<input type="hidden" name="csrf_token" value="abc123">"#)
        );
        assert!(!without_token.as_str().contains(CSRF_FIELD));
    }

    #[test]
    fn compact_only_changes_whitespace() {
        let registry = ValidatorRegistry::new();
        let encoder = Encoder::new(&registry, &PlainDecorator);
        let pretty = encoder.encode(&login()).unwrap();
        let compact = Encoder::new(&registry, &PlainDecorator)
            .compact(true)
            .encode(&login())
            .unwrap();

        let squashed: String = pretty
            .as_str()
            .lines()
            .map(|line| line.trim_start_matches('\t'))
            .collect();
        assert_eq!(squashed, compact.as_str());
        assert!(pretty.as_str().contains('\n'));
        assert!(!compact.as_str().contains('\n'));
    }

    #[test]
    fn errors_are_attached_to_their_field() {
        let registry = ValidatorRegistry::new();
        let mut errors = FieldErrors::new();
        errors.insert("User", "unknown user");
        let html = Encoder::new(&registry, &PlainDecorator)
            .errors(&errors)
            .compact(true)
            .encode(&login())
            .unwrap();

        let user = html.as_str().find(r#"name="User""#).unwrap();
        let message = html.as_str().find("unknown user").unwrap();
        let secret = html.as_str().find(r#"name="Secret""#).unwrap();
        assert!(user < message && message < secret);
    }

    #[test]
    fn field_values_mirror_browser_submission() {
        let registry = ValidatorRegistry::new();
        let values = Encoder::new(&registry, &PlainDecorator)
            .csrf_token("tok")
            .field_values(&login())
            .unwrap();

        let pairs: Vec<(&str, &str)> = values.iter().collect();
        assert_eq!(
            pairs,
            vec![("csrf_token", "tok"), ("Id", "7"), ("User", "ada"), ("Secret", "")]
        );
    }
}
