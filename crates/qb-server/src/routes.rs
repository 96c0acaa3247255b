//! Request routing, independent of the HTTP transport.

use chrono::Utc;
use qb_config::QuoteConfig;
use qb_core::AddQuoteForm;
use qb_core::validators::validator_registry;
use qb_form::{BootstrapDecorator, CSRF_FIELD, Decoder, Encoder, FieldErrors, FormValues, Markup, ValidatorRegistry};
use qb_store::QuoteStore;
use tiny_http::Method;

use crate::csrf::CsrfTokens;
use crate::error::ServerError;
use crate::pages;

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// A response before it is handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Reply {
    fn html(status: u16, markup: Markup) -> Self {
        Self {
            status,
            content_type: HTML,
            headers: Vec::new(),
            body: markup.into_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn redirect(location: &str) -> Self {
        Self::text(302, "").with_header("Location", location)
    }

    fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Shared application state. One instance serves every worker thread.
pub struct App {
    store: QuoteStore,
    registry: ValidatorRegistry,
    csrf: CsrfTokens,
    decorator: BootstrapDecorator,
}

impl App {
    pub fn new(store: QuoteStore, config: &QuoteConfig) -> Self {
        Self {
            store,
            registry: validator_registry(&config.password),
            csrf: CsrfTokens::new(config.csrf_ttl()),
            decorator: BootstrapDecorator,
        }
    }

    /// Route one request. Hard errors become a generic 500 and are logged.
    pub fn handle(&self, method: &Method, url: &str, body: &str) -> Reply {
        let path = url.split_once('?').map_or(url, |(path, _)| path);

        let result = match (path, method) {
            ("/", Method::Get | Method::Head) => self.index(),
            ("/add-quote", Method::Get | Method::Head) => self.add_quote(),
            ("/submit", Method::Post) => self.submit(body),
            ("/" | "/add-quote", _) => Ok(method_not_allowed("GET, HEAD")),
            ("/submit", _) => Ok(method_not_allowed("POST")),
            _ => Ok(Reply::text(404, "not found")),
        };

        result.unwrap_or_else(|error| {
            tracing::error!(%error, %method, %path, "request failed");
            Reply::text(500, "internal error")
        })
    }

    fn index(&self) -> Result<Reply, ServerError> {
        let quotes = self.store.list()?;
        Ok(Reply::html(200, pages::index(&quotes)))
    }

    fn add_quote(&self) -> Result<Reply, ServerError> {
        self.form_page(200, &AddQuoteForm::default(), &FieldErrors::new())
    }

    fn submit(&self, body: &str) -> Result<Reply, ServerError> {
        let values = FormValues::parse(body);

        let token = values.get(CSRF_FIELD).unwrap_or_default();
        if !self.csrf.verify(token) {
            tracing::warn!("rejected submission with missing or stale CSRF token");
            return Ok(Reply::text(403, "invalid or expired form token"));
        }

        let decoded = Decoder::new(&self.registry).decode::<AddQuoteForm>(&values)?;
        if !decoded.is_ok() {
            tracing::info!(errors = decoded.errors.len(), "submission failed validation");
            return self.form_page(422, &decoded.record, &decoded.errors);
        }

        let quote = decoded.record.into_quote(Utc::now());
        self.store.save(&quote)?;
        Ok(Reply::redirect("/"))
    }

    fn form_page(&self, status: u16, form: &AddQuoteForm, errors: &FieldErrors) -> Result<Reply, ServerError> {
        let token = self.csrf.issue()?;
        let fields = Encoder::new(&self.registry, &self.decorator)
            .csrf_token(token)
            .errors(errors)
            .encode(form)?;
        Ok(Reply::html(status, pages::add_quote(&fields)))
    }
}

fn method_not_allowed(allow: &str) -> Reply {
    Reply::text(405, "method not allowed").with_header("Allow", allow)
}
