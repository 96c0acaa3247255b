//! HTML pages. Static chrome is trusted; everything from a quote or a form
//! goes through `Element` or `qb_core::render` and is escaped.

use qb_core::Quote;
use qb_core::render;
use qb_form::{Element, Markup, MarkupWriter};

const BOOTSTRAP_CSS: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.5.2/css/bootstrap.min.css";
const FONT_AWESOME_CSS: &str = "https://use.fontawesome.com/releases/v5.8.0/css/all.css";
const QUOTE_ICON_STYLE: &str =
    "font-size: 4em; color: #0a84ff; float: left; margin-right: 30px; margin-left: 20px;";
const TAGLINE: &str = "yet another useless project by seejy";

struct Layout<'a> {
    title: &'a str,
    heading: &'a str,
    stylesheets: &'a [&'a str],
    nav: Element,
    footer_class: &'a str,
}

impl Layout<'_> {
    fn render(self, content: impl FnOnce(&mut MarkupWriter)) -> Markup {
        let html = Element::new("html").attr("lang", "en");
        let head = Element::new("head");
        let body = Element::new("body");
        let container = Element::new("div").class("container");
        let main = Element::new("div").class("mt-5");
        let left = Element::new("div").class("float-left");
        let right = Element::new("div").class("float-right");

        let mut out = MarkupWriter::new(false);
        out.line(&Markup::trusted("<!DOCTYPE html>"));
        out.open(&html);
        out.open(&head);
        out.line(&Element::new("title").text(self.title).render());
        for href in self.stylesheets {
            out.line(
                &Element::void("link")
                    .attr("rel", "stylesheet")
                    .attr("type", "text/css")
                    .attr("href", href)
                    .render(),
            );
        }
        out.close(&head);
        out.open(&body);
        out.open(&container);
        out.open(&main);
        out.open(&left);
        out.line(&Element::new("h2").text(self.heading).render());
        out.close(&left);
        out.open(&right);
        out.line(&self.nav.render());
        out.close(&right);
        out.line(&clearfix());
        content(&mut out);
        out.close(&main);
        out.line(
            &Element::new("footer")
                .class(self.footer_class)
                .child(&Element::new("em").text(TAGLINE).render())
                .render(),
        );
        out.close(&container);
        out.close(&body);
        out.close(&html);
        out.finish()
    }
}

fn clearfix() -> Markup {
    Element::new("div").class("clearfix").render()
}

/// The list of quotes, newest first as given.
pub fn index(quotes: &[Quote]) -> Markup {
    let layout = Layout {
        title: "Quotes",
        heading: "Quotes",
        stylesheets: &[BOOTSTRAP_CSS, FONT_AWESOME_CSS],
        nav: Element::new("a")
            .attr("href", "/add-quote")
            .class("btn btn-success")
            .text("Add a Quote"),
        footer_class: "text-right text-muted mb-5",
    };

    layout.render(|out| {
        if quotes.is_empty() {
            out.line(
                &Element::new("p")
                    .class("mt-5 text-muted")
                    .text("No quotes yet.")
                    .render(),
            );
        }
        for quote in quotes {
            write_quote(out, quote);
        }
    })
}

fn write_quote(out: &mut MarkupWriter, quote: &Quote) {
    let card = Element::new("div").class("card mt-5 mb-5");
    let body = Element::new("div").class("card-body");
    let row = Element::new("div").class("row");
    let attribution = Element::new("div").class("float-right text-muted");

    out.open(&card);
    out.open(&body);
    out.open(&row);
    out.line(
        &Element::new("i")
            .class("fas fa-quote-left")
            .attr("style", QUOTE_ICON_STYLE)
            .render(),
    );
    out.line(
        &Element::new("h3")
            .class("mt-4 d-inline-block")
            .child(&render::quote_body(&quote.what_silly_thing_did_they_say))
            .render(),
    );
    out.close(&row);
    out.open(&attribution);
    let mut author = Markup::escape("~ ");
    author.push(&render::author(&quote.who_said_the_silly_thing));
    author.push(&Element::void("br").render());
    out.line(&author);
    out.line(
        &Element::new("small")
            .text(&format!("Submitted on {}", render::submitted_on(&quote.time)))
            .render(),
    );
    out.close(&attribution);
    out.close(&body);
    out.close(&card);
}

/// The submission page around already encoded form fields.
pub fn add_quote(fields: &Markup) -> Markup {
    let layout = Layout {
        title: "Add a Quote",
        heading: "Submit a Quote",
        stylesheets: &[BOOTSTRAP_CSS],
        nav: Element::new("a")
            .attr("href", "/")
            .class("btn btn-primary")
            .text("Go Home"),
        footer_class: "text-right text-muted mb-5 mt-5",
    };

    layout.render(|out| {
        let form = Element::new("form")
            .attr("method", "POST")
            .attr("action", "/submit")
            .class("mt-5");
        out.open(&form);
        out.fragment(fields);
        out.line(
            &Element::new("button")
                .attr("type", "submit")
                .class("btn btn-success float-right")
                .text("Submit")
                .render(),
        );
        out.close(&form);
        out.line(&clearfix());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn quote(who: &str, what: &str) -> Quote {
        Quote {
            time: Utc.with_ymd_and_hms(2020, 9, 21, 14, 3, 11).unwrap(),
            who_said_the_silly_thing: who.into(),
            what_silly_thing_did_they_say: what.into(),
        }
    }

    #[test]
    fn index_lists_quotes_in_given_order() {
        let html = index(&[quote("Carol", "newer"), quote("Alice", "older")]);
        let html = html.as_str();

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        let newer = html.find("newer").unwrap();
        let older = html.find("older").unwrap();
        assert!(newer < older);
        assert!(html.contains("~ Carol<br>"));
        assert!(html.contains("Submitted on Mon, 21 Sep 2020 14:03:11 UTC"));
        assert!(html.contains(r#"<a href="/add-quote" class="btn btn-success">Add a Quote</a>"#));
    }

    #[test]
    fn index_escapes_quote_content() {
        let html = index(&[quote("<script>x</script>", "<b>hi</b>\r\nthere")]);
        let html = html.as_str();

        assert!(!html.contains("<script>"));
        assert!(html.contains("~ &lt;script&gt;x&lt;/script&gt;<br>"));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;<br>there"));
    }

    #[test]
    fn index_renders_images() {
        let html = index(&[quote("Bob", "https://example.com/cat.png")]);
        assert!(
            html.as_str()
                .contains(r#"<img src="https://example.com/cat.png" class="img img-fluid""#)
        );
    }

    #[test]
    fn empty_index_says_so() {
        assert!(index(&[]).as_str().contains("No quotes yet."));
    }

    #[test]
    fn add_quote_wraps_fields_in_form() {
        let fields = Element::void("input").attr("name", "X").render();
        let html = add_quote(&fields);
        let html = html.as_str();

        let form = html.find(r#"<form method="POST" action="/submit" class="mt-5">"#).unwrap();
        let input = html.find(r#"<input name="X">"#).unwrap();
        let button = html.find("Submit</button>").unwrap();
        assert!(form < input && input < button);
        assert!(html.contains("<title>Add a Quote</title>"));
    }
}
