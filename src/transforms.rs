//! Post-match text transforms: typographic punctuation for plain text runs and
//! e-mail address obfuscation for autolinks.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

fn substitution(pattern: &str, replacement: &'static str) -> Substitution {
    Substitution {
        pattern: Regex::new(pattern)
            .unwrap_or_else(|e| panic!("smartypants pattern {pattern:?} failed to compile: {e}")),
        replacement,
    }
}

/// Applied in order; later entries see the output of earlier ones.
static SMARTYPANTS: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    vec![
        // em-dashes
        substitution("---", "\u{2014}"),
        // en-dashes
        substitution("--", "\u{2013}"),
        // opening singles
        substitution(r#"(^|[-\x{2014}/(\[{"\s])'"#, "${1}\u{2018}"),
        // closing singles & apostrophes
        substitution("'", "\u{2019}"),
        // opening doubles
        substitution(r"(^|[-\x{2014}/(\[{\x{2018}\s])\x22", "${1}\u{201c}"),
        // closing doubles
        substitution("\"", "\u{201d}"),
        // ellipses
        substitution(r"\.{3}", "\u{2026}"),
    ]
});

/// Replace straight quotes, dashes and ellipses with their typographic forms.
pub fn smartypants(text: &str) -> String {
    SMARTYPANTS
        .iter()
        .fold(text.to_string(), |acc, sub| {
            sub.pattern.replace_all(&acc, sub.replacement).into_owned()
        })
}

/// Obfuscate `text` by encoding roughly half of its characters as hex
/// character references.
pub fn mangle(text: &str) -> String {
    mangle_with(text, &mut rand::rng())
}

/// [`mangle`] with an explicit random source.
///
/// Every character is independently either emitted as `&#x<hex>;` or kept
/// as-is, so decoding the result always yields `text` again.
pub fn mangle_with<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let mut out = String::with_capacity(text.len() * 4);
    for ch in text.chars() {
        if rng.random_bool(0.5) {
            out.push_str(&format!("&#x{:x};", u32::from(ch)));
        } else {
            out.push(ch);
        }
    }
    out
}
