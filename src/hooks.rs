//! Caller-supplied string functions used during compilation.

use std::fmt;
use std::sync::Arc;

use crate::helpers;

pub type EscapeFn = Arc<dyn Fn(&str, bool) -> String + Send + Sync>;
pub type UnescapeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type SanitizerFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Escaping and sanitizing functions.
///
/// `escape(html, encode)` is applied to every piece of text the lexer emits;
/// `sanitizer` replaces `escape` for raw HTML tags when sanitizing is enabled.
#[derive(Clone)]
pub struct Hooks {
    pub escape: EscapeFn,
    pub unescape: UnescapeFn,
    pub sanitizer: Option<SanitizerFn>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            escape: Arc::new(helpers::escape),
            unescape: Arc::new(helpers::unescape),
            sanitizer: None,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("sanitizer", &self.sanitizer.is_some())
            .finish_non_exhaustive()
    }
}

impl Hooks {
    pub fn with_escape(
        mut self,
        escape: impl Fn(&str, bool) -> String + Send + Sync + 'static,
    ) -> Self {
        self.escape = Arc::new(escape);
        self
    }

    pub fn with_unescape(
        mut self,
        unescape: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.unescape = Arc::new(unescape);
        self
    }

    pub fn with_sanitizer(
        mut self,
        sanitizer: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.sanitizer = Some(Arc::new(sanitizer));
        self
    }

    pub fn escape(&self, html: &str, encode: bool) -> String {
        (self.escape)(html, encode)
    }

    pub fn unescape(&self, html: &str) -> String {
        (self.unescape)(html)
    }

    /// Sanitize a raw HTML tag: the sanitizer if one is set, otherwise escape it.
    pub fn sanitize(&self, html: &str) -> String {
        match &self.sanitizer {
            Some(sanitizer) => sanitizer(html),
            None => self.escape(html, false),
        }
    }
}
