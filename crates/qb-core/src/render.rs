//! How quotes are shown on the index page.
//!
//! Only the quote body gets markup of its own, and only markup generated here:
//! an `<img>` for image links, `<a>` around URLs and `<br>` for line breaks.
//! Everything the visitor typed is escaped, and the author name is always
//! plain escaped text.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use qb_form::{Element, Markup};
use regex::Regex;

/// Extensions treated as images.
pub const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("URL pattern is valid"));

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+\S*$").expect("URL pattern is valid"));

/// `true` if the whole (trimmed) text is an http(s) URL to an image.
#[must_use]
pub fn is_image_url(text: &str) -> bool {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    ABSOLUTE_URL.is_match(&lower)
        && IMAGE_EXTENSIONS
            .iter()
            .any(|extension| lower.ends_with(extension))
}

/// The quote body as markup.
#[must_use]
pub fn quote_body(text: &str) -> Markup {
    if is_image_url(text) {
        return Element::void("img")
            .attr("src", text.trim())
            .class("img img-fluid")
            .attr("style", "max-height: 400px;")
            .render();
    }

    let mut html = Markup::default();
    let mut rest = 0;
    for found in URL.find_iter(text) {
        let url = found.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
        html.push(&plain_text(&text[rest..found.start()]));
        html.push(
            &Element::new("a")
                .attr("href", url)
                .attr("rel", "nofollow noopener")
                .attr("target", "_blank")
                .text(url)
                .render(),
        );
        rest = found.start() + url.len();
    }
    html.push(&plain_text(&text[rest..]));
    html
}

/// Escaped text with line breaks turned into `<br>`.
fn plain_text(text: &str) -> Markup {
    let escaped = Markup::escape(text).into_string();
    Markup::trusted(escaped.replace("\r\n", "<br>").replace('\n', "<br>"))
}

/// The author name, always escaped.
#[must_use]
pub fn author(name: &str) -> Markup {
    Markup::escape(name)
}

/// Submission time as shown under a quote.
#[must_use]
pub fn submitted_on(time: &DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/cat.png", true)]
    #[case("http://example.com/a/b/cat.jpeg", true)]
    #[case("  https://example.com/cat.GIF\r\n", true)]
    #[case("https://example.com/cat.jpg", true)]
    #[case("https://example.com/page", false)]
    #[case("check this out: https://example.com/cat.png", false)]
    #[case("cat.png", false)]
    #[case("ftp://example.com/cat.png", false)]
    #[case("https://example.com/cat.png?size=large", false)]
    #[case("https:///cat.png", false)]
    fn detects_image_urls(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_image_url(text), expected);
    }

    #[test]
    fn image_urls_become_img_tags() {
        assert_eq!(
            quote_body("https://example.com/cat.png").as_str(),
            r#"<img src="https://example.com/cat.png" class="img img-fluid" style="max-height: 400px;">"#
        );
    }

    #[test]
    fn urls_in_text_become_links() {
        assert_eq!(
            quote_body("check this out: https://example.com/page").as_str(),
            concat!(
                "check this out: ",
                r#"<a href="https://example.com/page" rel="nofollow noopener" target="_blank">"#,
                "https://example.com/page</a>"
            )
        );
    }

    #[test]
    fn trailing_punctuation_stays_outside_links() {
        let html = quote_body("see https://example.com/page.");
        assert!(html.as_str().ends_with("https://example.com/page</a>."));
    }

    #[test]
    fn text_is_escaped_and_line_breaks_kept() {
        assert_eq!(
            quote_body("<script>alert('hi')</script>\r\nsecond & last\nline").as_str(),
            "&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;<br>second &amp; last<br>line"
        );
    }

    #[test]
    fn attribute_breakout_is_escaped_in_links() {
        let html = quote_body(r#"http://x.io/"onmouseover="alert(1)"#);
        assert!(!html.as_str().contains(r#""onmouseover"#));
    }

    #[test]
    fn author_is_always_escaped() {
        assert_eq!(
            author("<img src=x onerror=alert(1)>").as_str(),
            "&lt;img src=x onerror=alert(1)&gt;"
        );
        assert_eq!(author("https://example.com/cat.png").as_str(), "https://example.com/cat.png");
    }

    #[test]
    fn submission_time_format() {
        let time = Utc.with_ymd_and_hms(2020, 9, 21, 14, 3, 11).unwrap();
        assert_eq!(submitted_on(&time), "Mon, 21 Sep 2020 14:03:11 UTC");
    }
}
