//! Pluggable presentation of form fields.
//!
//! The encoder decides *which* fields are rendered and with which values; a
//! [`Decorator`] decides *how* one field looks. Decorators are stateless and
//! can be swapped without touching the engine.

use crate::markup::{Element, Markup, MarkupWriter};
use crate::schema::{FieldDescriptor, WidgetKind};

/// Everything a decorator needs to render one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub descriptor: &'a FieldDescriptor,
    /// Current value in its form representation.
    pub value: &'a str,
    /// Message from a previous decode, when re-rendering a rejected form.
    pub error: Option<&'a str>,
}

/// Renders field views as markup.
pub trait Decorator: Send + Sync {
    /// Write a labelled input for `view`.
    fn field(&self, out: &mut MarkupWriter, view: &FieldView<'_>);

    /// Write a hidden input carrying `value`.
    fn hidden(&self, out: &mut MarkupWriter, name: &str, value: &str) {
        out.line(
            &Element::void("input")
                .attr("type", "hidden")
                .attr("name", name)
                .attr("value", value)
                .render(),
        );
    }
}

/// The bare input element for `view`, with `id` and `name` set to the field
/// identifier. Password inputs never carry a value.
#[must_use]
pub fn control(view: &FieldView<'_>) -> Element {
    let name = view.descriptor.name.as_str();
    let input = |kind: &str| {
        Element::void("input")
            .attr("type", kind)
            .attr("id", name)
            .attr("name", name)
    };

    match view.descriptor.widget {
        WidgetKind::Text => input("text").attr("value", view.value),
        WidgetKind::Number => input("number").attr("value", view.value),
        WidgetKind::Hidden => input("hidden").attr("value", view.value),
        WidgetKind::Password => input("password"),
        WidgetKind::Checkbox => {
            let checkbox = input("checkbox").attr("value", "true");
            if view.value == "true" {
                checkbox.flag("checked")
            } else {
                checkbox
            }
        }
        WidgetKind::TextArea => Element::new("textarea")
            .attr("id", name)
            .attr("name", name)
            .text(view.value),
    }
}

fn label(view: &FieldView<'_>) -> Element {
    Element::new("label")
        .attr("for", &view.descriptor.name)
        .text(&view.descriptor.label)
}

/// Bootstrap 4 form groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapDecorator;

impl Decorator for BootstrapDecorator {
    fn field(&self, out: &mut MarkupWriter, view: &FieldView<'_>) {
        let checkbox = view.descriptor.widget == WidgetKind::Checkbox;
        let (group_class, control_class, label_class) = if checkbox {
            ("form-group form-check", "form-check-input", Some("form-check-label"))
        } else {
            ("form-group", "form-control", None)
        };
        let control_class = if view.error.is_some() {
            format!("{control_class} is-invalid")
        } else {
            control_class.to_string()
        };

        let group = Element::new("div").class(group_class);
        let caption = label_class.map_or_else(|| label(view), |class| label(view).class(class));
        let control = control(view).class(control_class);

        out.open(&group);
        if checkbox {
            out.line(&control.render());
            out.line(&caption.render());
        } else {
            out.line(&caption.render());
            out.line(&control.render());
        }
        if let Some(error) = view.error {
            out.line(&Element::new("div").class("invalid-feedback").text(error).render());
        }
        if let Some(help) = &view.descriptor.help {
            out.line(
                &Element::new("small")
                    .class("form-text text-muted")
                    .text(help)
                    .render(),
            );
        }
        out.close(&group);
    }
}

/// Unstyled label/input pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDecorator;

impl Decorator for PlainDecorator {
    fn field(&self, out: &mut MarkupWriter, view: &FieldView<'_>) {
        let paragraph = Element::new("p");
        out.open(&paragraph);
        out.line(&label(view).render());
        out.line(&control(view).render());
        if let Some(error) = view.error {
            out.line(&Element::new("strong").class("error").text(error).render());
        }
        if let Some(help) = &view.descriptor.help {
            out.line(&Element::new("small").text(help).render());
        }
        out.close(&paragraph);
    }
}

impl Markup {
    /// Render a single field with `decorator`, outside of a full form.
    #[must_use]
    pub fn field(decorator: &dyn Decorator, view: &FieldView<'_>, compact: bool) -> Self {
        let mut out = MarkupWriter::new(compact);
        decorator.field(&mut out, view);
        out.finish()
    }
}
