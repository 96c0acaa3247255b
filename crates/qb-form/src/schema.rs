//! Field metadata and the schema reflector.
//!
//! A record type declares its form fields explicitly by implementing
//! [`FormRecord`]. Each [`Field`] pairs typed accessors with display metadata;
//! sub-records are flattened into the parent with [`SchemaBuilder::embed`]
//! (bare identifiers) or [`SchemaBuilder::nest`] (`prefix.field` identifiers).
//! [`reflect`] turns the declaration into an ordered list of
//! [`FieldDescriptor`]s and rejects structurally broken schemas.

use std::collections::HashSet;
use std::sync::Arc;

use crate::encode::CSRF_FIELD;
use crate::error::SchemaError;
use crate::scalar::{FieldValue, ParseScalarError, Scalar, ScalarKind};
use crate::validator::ValidatorRegistry;

/// Joins the identifiers of nested fields, e.g. `Address.Street`.
pub const FIELD_PATH_SEPARATOR: char = '.';

/// How a field is presented in the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Text,
    TextArea,
    Password,
    Number,
    Checkbox,
    /// Rendered as a hidden input so the value survives a round trip.
    Hidden,
}

impl WidgetKind {
    /// The widget used when a field does not request one.
    #[must_use]
    pub const fn infer(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Text | ScalarKind::Timestamp => Self::Text,
            ScalarKind::Password => Self::Password,
            ScalarKind::Integer => Self::Number,
            ScalarKind::Boolean => Self::Checkbox,
        }
    }
}

/// Resolved metadata for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Identifier used as the input `name` and the submitted-value key.
    pub name: String,
    pub label: String,
    pub widget: WidgetKind,
    pub help: Option<String>,
    /// Validator names, run in this order.
    pub validators: Vec<String>,
    /// `false` for suppressed fields: never rendered, never read from input.
    pub visible: bool,
    pub kind: ScalarKind,
}

type Render<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type Assign<T> = Box<dyn Fn(&mut T, &str) -> Result<FieldValue, ParseScalarError> + Send + Sync>;
type Reset<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// One declared form field of record type `T`.
pub struct Field<T> {
    name: String,
    label: Option<String>,
    widget: Option<WidgetKind>,
    help: Option<String>,
    validators: Vec<String>,
    visible: bool,
    kind: ScalarKind,
    render: Render<T>,
    assign: Assign<T>,
    reset: Reset<T>,
}

impl<T: 'static> Field<T> {
    /// Declare a field backed by a scalar member of `T`.
    ///
    /// `get` reads the member for encoding; `set` stores a converted value
    /// while decoding.
    pub fn new<V, G, S>(name: impl Into<String>, get: G, set: S) -> Self
    where
        V: Scalar,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let set = Arc::new(set);
        let reset_set = Arc::clone(&set);

        Self {
            name: name.into(),
            label: None,
            widget: None,
            help: None,
            validators: Vec::new(),
            visible: true,
            kind: V::KIND,
            render: Box::new(move |record: &T| get(record).to_form()),
            assign: Box::new(move |record: &mut T, raw: &str| {
                let value = V::parse_form(raw)?;
                let field_value = value.to_field_value();
                set(record, value);
                Ok(field_value)
            }),
            reset: Box::new(move |record: &mut T| reset_set(record, V::default())),
        }
    }

    /// Display label. Defaults to the identifier.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Override the inferred widget.
    #[must_use]
    pub const fn widget(mut self, widget: WidgetKind) -> Self {
        self.widget = Some(widget);
        self
    }

    /// Append a validator by registry name.
    #[must_use]
    pub fn validator(mut self, name: impl Into<String>) -> Self {
        self.validators.push(name.into());
        self
    }

    /// Keep the field out of the form entirely.
    #[must_use]
    pub const fn suppressed(mut self) -> Self {
        self.visible = false;
        self
    }

    pub(crate) fn render(&self, record: &T) -> String {
        (self.render)(record)
    }

    pub(crate) fn assign(&self, record: &mut T, raw: &str) -> Result<FieldValue, ParseScalarError> {
        (self.assign)(record, raw)
    }

    pub(crate) fn reset(&self, record: &mut T) {
        (self.reset)(record);
    }

    fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name.clone(),
            label: self.label.clone().unwrap_or_else(|| self.name.clone()),
            widget: self.widget.unwrap_or_else(|| WidgetKind::infer(self.kind)),
            help: self.help.clone(),
            validators: self.validators.clone(),
            visible: self.visible,
            kind: self.kind,
        }
    }

    /// Re-home this field onto a parent record reached through a lens.
    fn project<P: 'static>(
        self,
        prefix: Option<&str>,
        get: Arc<dyn Fn(&P) -> &T + Send + Sync>,
        get_mut: Arc<dyn Fn(&mut P) -> &mut T + Send + Sync>,
    ) -> Field<P> {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{FIELD_PATH_SEPARATOR}{}", self.name),
            None => self.name,
        };
        let render = self.render;
        let assign = self.assign;
        let reset = self.reset;
        let assign_lens = Arc::clone(&get_mut);

        Field {
            name,
            label: self.label,
            widget: self.widget,
            help: self.help,
            validators: self.validators,
            visible: self.visible,
            kind: self.kind,
            render: Box::new(move |parent: &P| render(get(parent))),
            assign: Box::new(move |parent: &mut P, raw: &str| assign(assign_lens(parent), raw)),
            reset: Box::new(move |parent: &mut P| reset(get_mut(parent))),
        }
    }
}

/// The ordered form fields of record type `T`.
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Schema<T> {
    #[must_use]
    pub const fn builder() -> SchemaBuilder<T> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Descriptors in declaration order, without checking them.
    #[must_use]
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(Field::descriptor).collect()
    }

    /// Descriptors in declaration order, checked against `registry`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` on duplicate or reserved identifiers and on
    /// validator names missing from `registry`.
    pub fn resolve(&self, registry: &ValidatorRegistry) -> Result<Vec<FieldDescriptor>, SchemaError> {
        let descriptors = self.descriptors();
        let mut seen = HashSet::with_capacity(descriptors.len());

        for descriptor in &descriptors {
            if descriptor.name == CSRF_FIELD {
                return Err(SchemaError::ReservedField(descriptor.name.clone()));
            }
            if !seen.insert(descriptor.name.as_str()) {
                return Err(SchemaError::DuplicateField(descriptor.name.clone()));
            }
            if let Some(missing) = descriptor
                .validators
                .iter()
                .find(|name| !registry.contains(name))
            {
                return Err(SchemaError::UnknownValidator {
                    field: descriptor.name.clone(),
                    validator: missing.clone(),
                });
            }
        }

        Ok(descriptors)
    }

    pub(crate) fn fields(&self) -> &[Field<T>] {
        &self.fields
    }
}

/// Builder returned by [`Schema::builder`].
pub struct SchemaBuilder<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    #[must_use]
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Flatten an embedded sub-record, keeping its identifiers unprefixed.
    #[must_use]
    pub fn embed<S, G, M>(self, schema: Schema<S>, get: G, get_mut: M) -> Self
    where
        S: 'static,
        G: Fn(&T) -> &S + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        self.flatten(None, schema, get, get_mut)
    }

    /// Flatten a named sub-record as `prefix.field` identifiers.
    #[must_use]
    pub fn nest<S, G, M>(self, prefix: &str, schema: Schema<S>, get: G, get_mut: M) -> Self
    where
        S: 'static,
        G: Fn(&T) -> &S + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        self.flatten(Some(prefix), schema, get, get_mut)
    }

    #[must_use]
    pub fn build(self) -> Schema<T> {
        Schema {
            fields: self.fields,
        }
    }

    fn flatten<S, G, M>(mut self, prefix: Option<&str>, schema: Schema<S>, get: G, get_mut: M) -> Self
    where
        S: 'static,
        G: Fn(&T) -> &S + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut S + Send + Sync + 'static,
    {
        let get: Arc<dyn Fn(&T) -> &S + Send + Sync> = Arc::new(get);
        let get_mut: Arc<dyn Fn(&mut T) -> &mut S + Send + Sync> = Arc::new(get_mut);

        self.fields.extend(
            schema
                .fields
                .into_iter()
                .map(|field| field.project(prefix, Arc::clone(&get), Arc::clone(&get_mut))),
        );
        self
    }
}

/// A record type that can be rendered as, and rebuilt from, a form.
pub trait FormRecord: Default + 'static {
    fn schema() -> Schema<Self>;
}

/// Resolve the ordered field descriptors of `T`.
///
/// Builds the schema afresh on every call; nothing is cached.
///
/// # Errors
///
/// Returns `SchemaError` if two fields share an identifier, a field uses the
/// reserved CSRF identifier, or a validator name is not registered.
pub fn reflect<T: FormRecord>(registry: &ValidatorRegistry) -> Result<Vec<FieldDescriptor>, SchemaError> {
    T::schema().resolve(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Inner {
        street: String,
        number: i64,
    }

    impl FormRecord for Inner {
        fn schema() -> Schema<Self> {
            Schema::builder()
                .field(Field::new("Street", |i: &Inner| &i.street, |i: &mut Inner, v| i.street = v))
                .field(Field::new("Number", |i: &Inner| &i.number, |i: &mut Inner, v| i.number = v))
                .build()
        }
    }

    #[derive(Debug, Default)]
    struct Outer {
        title: String,
        inner: Inner,
        home: Inner,
    }

    impl FormRecord for Outer {
        fn schema() -> Schema<Self> {
            Schema::builder()
                .field(
                    Field::new("Title", |o: &Outer| &o.title, |o: &mut Outer, v| o.title = v)
                        .label("Title of the thing")
                        .widget(WidgetKind::TextArea),
                )
                .embed(Inner::schema(), |o: &Outer| &o.inner, |o: &mut Outer| &mut o.inner)
                .nest("Home", Inner::schema(), |o: &Outer| &o.home, |o: &mut Outer| &mut o.home)
                .build()
        }
    }

    #[test]
    fn flattening_preserves_declaration_order() {
        let names: Vec<String> = Outer::schema()
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec!["Title", "Street", "Number", "Home.Street", "Home.Number"]
        );
    }

    #[test]
    fn defaults_fill_label_and_widget() {
        let descriptors = Outer::schema().descriptors();
        assert_eq!(descriptors[0].label, "Title of the thing");
        assert_eq!(descriptors[0].widget, WidgetKind::TextArea);
        assert_eq!(descriptors[1].label, "Street");
        assert_eq!(descriptors[1].widget, WidgetKind::Text);
        assert_eq!(descriptors[2].widget, WidgetKind::Number);
        assert!(descriptors.iter().all(|d| d.visible && d.help.is_none()));
    }

    #[test]
    fn projected_accessors_reach_the_sub_record() {
        let schema = Outer::schema();
        let mut record = Outer::default();
        schema.fields()[3].assign(&mut record, "Main St").unwrap();
        schema.fields()[4].assign(&mut record, "12").unwrap();

        assert_eq!(record.home.street, "Main St");
        assert_eq!(record.home.number, 12);
        assert!(record.inner.street.is_empty());
        assert_eq!(schema.fields()[4].render(&record), "12");

        schema.fields()[3].reset(&mut record);
        assert!(record.home.street.is_empty());
    }

    #[test]
    fn widget_inference_follows_scalar_kind() {
        assert_eq!(WidgetKind::infer(ScalarKind::Text), WidgetKind::Text);
        assert_eq!(WidgetKind::infer(ScalarKind::Password), WidgetKind::Password);
        assert_eq!(WidgetKind::infer(ScalarKind::Integer), WidgetKind::Number);
        assert_eq!(WidgetKind::infer(ScalarKind::Boolean), WidgetKind::Checkbox);
        assert_eq!(WidgetKind::infer(ScalarKind::Timestamp), WidgetKind::Text);
    }
}
