//! Pattern templates: splice named placeholders into a rule pattern before
//! compiling it.
//!
//! A template is plain pattern source. [`PatternTemplate::set_group`] replaces
//! the first occurrence of a placeholder with a fragment, after stripping any
//! start-of-input anchor (`^`) the fragment carries outside a character class.
//! Only grammar construction uses this; nothing is spliced per input.

use std::sync::LazyLock;

use fancy_regex::{Regex, RegexBuilder};

use crate::error::GrammarError;

/// `^` anchors that are not the negation marker of a character class.
static ANCHOR: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(^|[^\[])\^")
        .unwrap_or_else(|e| panic!("anchor pattern failed to compile: {e}"))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTemplate {
    source: String,
}

impl PatternTemplate {
    pub fn new(base: &str) -> Self {
        Self {
            source: base.to_string(),
        }
    }

    /// Replace the first occurrence of `name` with `fragment`.
    pub fn set_group(mut self, name: &str, fragment: &str) -> Self {
        let fragment = ANCHOR.replace_all(fragment, "$1");
        self.source = self.source.replacen(name, &fragment, 1);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compile with an unbounded backtracking budget.
    pub fn compile(self, rule: &'static str) -> Result<Regex, GrammarError> {
        RegexBuilder::new(&self.source)
            .backtrack_limit(usize::MAX)
            .build()
            .map_err(|source| GrammarError { rule, source })
    }
}

/// Apply every substitution in order and compile the result.
pub fn expand(
    rule: &'static str,
    base: &str,
    substitutions: &[(&str, &str)],
) -> Result<Regex, GrammarError> {
    substitutions
        .iter()
        .fold(PatternTemplate::new(base), |template, (name, fragment)| {
            template.set_group(name, fragment)
        })
        .compile(rule)
}
