//! Output formatting callbacks.
//!
//! The lexer never builds markup itself: every recognized construct is handed
//! to a [`Renderer`]. Arguments arrive already escaped (and, for nested
//! constructs, already compiled).

use percent_encoding::percent_decode_str;

use crate::config::Config;
use crate::hooks::{Hooks, UnescapeFn};

pub trait Renderer: Send + Sync {
    fn link(&self, href: &str, title: Option<&str>, text: &str) -> String;
    fn image(&self, href: &str, title: Option<&str>, alt: &str) -> String;
    fn strong(&self, text: &str) -> String;
    fn em(&self, text: &str) -> String;
    fn codespan(&self, text: &str) -> String;
    fn br(&self) -> String;
    fn del(&self, text: &str) -> String;
    fn text(&self, text: &str) -> String;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn link(&self, href: &str, title: Option<&str>, text: &str) -> String {
        (**self).link(href, title, text)
    }

    fn image(&self, href: &str, title: Option<&str>, alt: &str) -> String {
        (**self).image(href, title, alt)
    }

    fn strong(&self, text: &str) -> String {
        (**self).strong(text)
    }

    fn em(&self, text: &str) -> String {
        (**self).em(text)
    }

    fn codespan(&self, text: &str) -> String {
        (**self).codespan(text)
    }

    fn br(&self) -> String {
        (**self).br()
    }

    fn del(&self, text: &str) -> String {
        (**self).del(text)
    }

    fn text(&self, text: &str) -> String {
        (**self).text(text)
    }
}

const UNSAFE_PROTOCOLS: &[&str] = &["javascript:", "vbscript:", "data:"];

/// The default HTML renderer.
#[derive(Clone)]
pub struct HtmlRenderer {
    sanitize: bool,
    xhtml: bool,
    unescape: UnescapeFn,
}

impl HtmlRenderer {
    pub fn new(config: &Config, hooks: &Hooks) -> Self {
        Self {
            sanitize: config.sanitize,
            xhtml: config.xhtml,
            unescape: hooks.unescape.clone(),
        }
    }

    /// Whether `href` points at a protocol that must not be linked when
    /// sanitizing. Undecodable hrefs count as unsafe.
    fn is_unsafe_href(&self, href: &str) -> bool {
        let unescaped = (self.unescape)(href);
        let Ok(decoded) = percent_decode_str(&unescaped).decode_utf8() else {
            return true;
        };
        let protocol: String = decoded
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ':')
            .collect::<String>()
            .to_lowercase();
        UNSAFE_PROTOCOLS
            .iter()
            .any(|prefix| protocol.starts_with(prefix))
    }

    fn void_close(&self) -> &'static str {
        if self.xhtml { "/>" } else { ">" }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(&Config::default(), &Hooks::default())
    }
}

impl Renderer for HtmlRenderer {
    fn link(&self, href: &str, title: Option<&str>, text: &str) -> String {
        if self.sanitize && self.is_unsafe_href(href) {
            log::debug!("Dropping link with unsafe href: {:?}", href);
            return text.to_string();
        }
        let mut out = format!("<a href=\"{}\"", href);
        if let Some(title) = title {
            out.push_str(&format!(" title=\"{}\"", title));
        }
        out.push('>');
        out.push_str(text);
        out.push_str("</a>");
        out
    }

    fn image(&self, href: &str, title: Option<&str>, alt: &str) -> String {
        let mut out = format!("<img src=\"{}\" alt=\"{}\"", href, alt);
        if let Some(title) = title {
            out.push_str(&format!(" title=\"{}\"", title));
        }
        out.push_str(self.void_close());
        out
    }

    fn strong(&self, text: &str) -> String {
        format!("<strong>{}</strong>", text)
    }

    fn em(&self, text: &str) -> String {
        format!("<em>{}</em>", text)
    }

    fn codespan(&self, text: &str) -> String {
        format!("<code>{}</code>", text)
    }

    fn br(&self) -> String {
        format!("<br{}", self.void_close())
    }

    fn del(&self, text: &str) -> String {
        format!("<del>{}</del>", text)
    }

    fn text(&self, text: &str) -> String {
        text.to_string()
    }
}
