//! Default HTML escaping helpers.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// The tail of an entity reference, starting right after the `&`.
static ENTITY_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?[A-Za-z0-9_]+;")
        .unwrap_or_else(|e| panic!("entity pattern failed to compile: {e}"))
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&(#[0-9]+|#x[0-9a-f]+|[A-Za-z0-9_]+);?")
        .unwrap_or_else(|e| panic!("entity pattern failed to compile: {e}"))
});

/// Escape `& < > " '` for HTML.
///
/// With `encode == false`, an `&` that already starts an entity reference is
/// kept, so escaping escaped text is a no-op.
pub fn escape(html: &str, encode: bool) -> String {
    let mut out = String::with_capacity(html.len());
    for (idx, ch) in html.char_indices() {
        match ch {
            '&' if !encode && ENTITY_TAIL.is_match(&html[idx + 1..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode numeric character references and `&colon;`; any other named
/// entity is dropped.
pub fn unescape(html: &str) -> String {
    match ENTITY.replace_all(html, |caps: &Captures| decode_entity(&caps[1])) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => text,
    }
}

fn decode_entity(name: &str) -> String {
    let name = name.to_lowercase();
    if name == "colon" {
        return ":".to_string();
    }
    let Some(number) = name.strip_prefix('#') else {
        return String::new();
    };
    let code = match number.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => number.parse::<u32>().ok(),
    };
    code.and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}
