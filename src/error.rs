//! Error types for grammar construction and inline compilation.

/// A rule pattern failed to compile.
///
/// The built-in grammars never produce this at runtime; it only surfaces for
/// hand-built patterns passed through [`crate::grammar::template`].
#[derive(Debug)]
pub struct GrammarError {
    pub rule: &'static str,
    pub source: fancy_regex::Error,
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid pattern for rule `{}`: {}", self.rule, self.source)
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Fatal errors raised while compiling an inline fragment.
///
/// Both variants point at a broken grammar rather than at bad input, so the
/// whole compilation is aborted.
#[derive(Debug)]
pub enum InlineError {
    /// No rule matched the remaining input.
    InfiniteLoop {
        /// Unicode scalar value of the first unconsumed character.
        code: u32,
        /// Byte offset of that character in the fragment being compiled.
        offset: usize,
    },
    /// The matching engine failed on a rule. Running out of backtracking
    /// stack is not reported here; the rule is skipped instead.
    Regex {
        rule: &'static str,
        source: fancy_regex::Error,
    },
}

impl std::fmt::Display for InlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InfiniteLoop { code, .. } => write!(f, "Infinite loop on byte: {}", code),
            Self::Regex { rule, source } => {
                write!(f, "rule `{}` failed to evaluate: {}", rule, source)
            }
        }
    }
}

impl std::error::Error for InlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InfiniteLoop { .. } => None,
            Self::Regex { source, .. } => Some(source),
        }
    }
}
