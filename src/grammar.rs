//! Inline grammar registry.
//!
//! A grammar is a fixed table of rule patterns, each anchored at the start of
//! the remaining input. Word characters in the rules are ASCII only
//! (`[A-Za-z0-9_]`). Four variants exist, built by layering overrides on the
//! standard table:
//!
//! - `Standard`: the base rules
//! - `Pedantic`: stricter `strong`/`em` delimiters
//! - `Gfm`: adds bare URLs and `~~strikethrough~~`, lets `~` be escaped
//! - `GfmBreaks`: GFM where any newline forces a line break
//!
//! Each variant is built once, on first use, and shared for the rest of the
//! process.

pub mod template;

use std::fmt;
use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::error::GrammarError;
use template::{PatternTemplate, expand};

const ESCAPE: &str = r"^\\([\\`*{}\[\]()#+\-.!_>])";
const AUTOLINK: &str = r"^<([^ <>]+(@|:/)[^ <>]+)>";
const TAG: &str = r#"^<!--[\s\S]*?-->|^</?[A-Za-z0-9_]+(?:"[^"]*"|'[^']*'|[^<'">])*?>"#;
const LINK: &str = r"^!?\[(inside)\]\(href\)";
const REFLINK: &str = r"^!?\[(inside)\]\s*\[([^\]]*)\]";
const NOLINK: &str = r"^!?\[((?:\[[^\]]*\]|[^\[\]])*)\]";
const STRONG: &str = r"^__([\s\S]+?)__(?!_)|^\*\*([\s\S]+?)\*\*(?!\*)";
const EM: &str = r"^_((?:[^_]|__)+?)_(?![A-Za-z0-9_])|^\*((?:\*\*|[\s\S])+?)\*(?!\*)";
const CODE: &str = r"^(`+)([\s\S]*?[^`])\1(?!`)";
const BR: &str = r"^ {2,}\n(?!\s*$)";
const TEXT: &str = r"^[\s\S]+?(?=[\\<!\[_*`]| {2,}\n|$)";

/// Bracket-balanced link text. Runs are atomic so the backtracking stack
/// grows with bracket count, not text length.
const INSIDE: &str = r"(?:(?>\[[^\]]*\])|(?>[^\[\]]+)|\](?=[^\[]*\]))*";
/// Link destination with an optional quoted title.
const HREF: &str = r#"\s*<?([\s\S]*?)>?(?:\s+['"]([\s\S]*?)['"])?\s*"#;

const PEDANTIC_STRONG: &str = r"^__(?=\S)([\s\S]*?\S)__(?!_)|^\*\*(?=\S)([\s\S]*?\S)\*\*(?!\*)";
const PEDANTIC_EM: &str = r"^_(?=\S)([\s\S]*?\S)_(?!_)|^\*(?=\S)([\s\S]*?\S)\*(?!\*)";

const GFM_URL: &str = r#"^(https?://[^\s<]+[^<.,:;"')\]\s])"#;
const GFM_DEL: &str = r"^~~(?=\S)([\s\S]*?\S)~~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    Standard,
    Pedantic,
    Gfm,
    GfmBreaks,
}

impl GrammarKind {
    pub const ALL: [GrammarKind; 4] = [
        GrammarKind::Standard,
        GrammarKind::Pedantic,
        GrammarKind::Gfm,
        GrammarKind::GfmBreaks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Pedantic => "pedantic",
            Self::Gfm => "gfm",
            Self::GfmBreaks => "gfm+breaks",
        }
    }
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The rule table of one grammar variant.
///
/// `url` and `del` are only present in the GFM family; their absence is what
/// disables those rules for the other variants.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub kind: GrammarKind,
    pub escape: Regex,
    pub autolink: Regex,
    pub url: Option<Regex>,
    pub tag: Regex,
    pub link: Regex,
    pub reflink: Regex,
    pub nolink: Regex,
    pub strong: Regex,
    pub em: Regex,
    pub code: Regex,
    pub br: Regex,
    pub del: Option<Regex>,
    pub text: Regex,
}

static STANDARD: LazyLock<Grammar> = LazyLock::new(|| built(GrammarKind::Standard));
static PEDANTIC: LazyLock<Grammar> = LazyLock::new(|| built(GrammarKind::Pedantic));
static GFM: LazyLock<Grammar> = LazyLock::new(|| built(GrammarKind::Gfm));
static GFM_BREAKS: LazyLock<Grammar> = LazyLock::new(|| built(GrammarKind::GfmBreaks));

fn built(kind: GrammarKind) -> Grammar {
    log::debug!("Building {} inline grammar", kind);
    Grammar::build(kind).unwrap_or_else(|err| panic!("built-in {kind} grammar is malformed: {err}"))
}

fn compile(rule: &'static str, pattern: &str) -> Result<Regex, GrammarError> {
    PatternTemplate::new(pattern).compile(rule)
}

impl Grammar {
    /// The shared, memoized grammar for `kind`.
    pub fn get(kind: GrammarKind) -> &'static Grammar {
        match kind {
            GrammarKind::Standard => &STANDARD,
            GrammarKind::Pedantic => &PEDANTIC,
            GrammarKind::Gfm => &GFM,
            GrammarKind::GfmBreaks => &GFM_BREAKS,
        }
    }

    /// Build a fresh, unshared copy of a variant.
    ///
    /// Prefer [`Grammar::get`]; this exists for callers that want to tweak a
    /// rule table before handing it to a lexer.
    pub fn build(kind: GrammarKind) -> Result<Grammar, GrammarError> {
        match kind {
            GrammarKind::Standard => Self::standard(),
            GrammarKind::Pedantic => Self::pedantic(Self::get(GrammarKind::Standard).clone()),
            GrammarKind::Gfm => Self::gfm(Self::get(GrammarKind::Standard).clone()),
            GrammarKind::GfmBreaks => Self::gfm_breaks(Self::get(GrammarKind::Gfm).clone()),
        }
    }

    fn standard() -> Result<Grammar, GrammarError> {
        Ok(Grammar {
            kind: GrammarKind::Standard,
            escape: compile("escape", ESCAPE)?,
            autolink: compile("autolink", AUTOLINK)?,
            url: None,
            tag: compile("tag", TAG)?,
            link: expand("link", LINK, &[("inside", INSIDE), ("href", HREF)])?,
            reflink: expand("reflink", REFLINK, &[("inside", INSIDE)])?,
            nolink: compile("nolink", NOLINK)?,
            strong: compile("strong", STRONG)?,
            em: compile("em", EM)?,
            code: compile("code", CODE)?,
            br: compile("br", BR)?,
            del: None,
            text: compile("text", TEXT)?,
        })
    }

    fn pedantic(base: Grammar) -> Result<Grammar, GrammarError> {
        Ok(Grammar {
            kind: GrammarKind::Pedantic,
            strong: compile("strong", PEDANTIC_STRONG)?,
            em: compile("em", PEDANTIC_EM)?,
            ..base
        })
    }

    fn gfm(base: Grammar) -> Result<Grammar, GrammarError> {
        let escape = expand("escape", base.escape.as_str(), &[("])", "~|])")])?;
        let text = expand(
            "text",
            base.text.as_str(),
            &[("]|", "~]|"), ("|", "|https?://|")],
        )?;
        Ok(Grammar {
            kind: GrammarKind::Gfm,
            escape,
            url: Some(compile("url", GFM_URL)?),
            del: Some(compile("del", GFM_DEL)?),
            text,
            ..base
        })
    }

    fn gfm_breaks(base: Grammar) -> Result<Grammar, GrammarError> {
        let br = expand("br", base.br.as_str(), &[("{2,}", "*")])?;
        let text = expand("text", base.text.as_str(), &[("{2,}", "*")])?;
        Ok(Grammar {
            kind: GrammarKind::GfmBreaks,
            br,
            text,
            ..base
        })
    }

    /// Rule names and pattern sources, in cascade order.
    pub fn rules(&self) -> Vec<(&'static str, &str)> {
        let mut rules = vec![
            ("escape", self.escape.as_str()),
            ("autolink", self.autolink.as_str()),
        ];
        if let Some(url) = &self.url {
            rules.push(("url", url.as_str()));
        }
        rules.extend([
            ("tag", self.tag.as_str()),
            ("link", self.link.as_str()),
            ("reflink", self.reflink.as_str()),
            ("nolink", self.nolink.as_str()),
            ("strong", self.strong.as_str()),
            ("em", self.em.as_str()),
            ("code", self.code.as_str()),
            ("br", self.br.as_str()),
        ]);
        if let Some(del) = &self.del {
            rules.push(("del", del.as_str()));
        }
        rules.push(("text", self.text.as_str()));
        rules
    }

    pub fn is_gfm(&self) -> bool {
        self.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
        re.captures(text)
            .unwrap()
            .and_then(|caps| caps.get(0))
            .map(|m| m.as_str())
    }

    #[test]
    fn test_registry_is_memoized() {
        for kind in GrammarKind::ALL {
            assert!(std::ptr::eq(Grammar::get(kind), Grammar::get(kind)));
            assert_eq!(Grammar::get(kind).kind, kind);
        }
    }

    #[test]
    fn test_link_template_is_spliced() {
        let grammar = Grammar::get(GrammarKind::Standard);
        assert!(!grammar.link.as_str().contains("inside"));
        assert!(!grammar.link.as_str().contains("href"));
        assert!(grammar.link.as_str().starts_with(r"^!?\[((?:(?>\[[^\]]*\])"));
    }

    #[test]
    fn test_gfm_escape_accepts_tilde() {
        assert_eq!(
            Grammar::get(GrammarKind::Gfm).escape.as_str(),
            r"^\\([\\`*{}\[\]()#+\-.!_>~|])"
        );
        assert_eq!(matched(&Grammar::get(GrammarKind::Gfm).escape, r"\~"), Some(r"\~"));
        assert_eq!(matched(&Grammar::get(GrammarKind::Standard).escape, r"\~"), None);
    }

    #[test]
    fn test_gfm_text_stops_before_tilde_and_url() {
        let gfm = Grammar::get(GrammarKind::Gfm);
        assert_eq!(
            gfm.text.as_str(),
            r"^[\s\S]+?(?=[\\<!\[_*`~]|https?://| {2,}\n|$)"
        );
        assert_eq!(matched(&gfm.text, "see http://x.y"), Some("see "));
        assert_eq!(matched(&gfm.text, "a~~b~~"), Some("a"));

        let standard = Grammar::get(GrammarKind::Standard);
        assert_eq!(matched(&standard.text, "see http://x.y"), Some("see http://x.y"));
    }

    #[test]
    fn test_breaks_relaxes_line_break() {
        let breaks = Grammar::get(GrammarKind::GfmBreaks);
        assert_eq!(breaks.br.as_str(), r"^ *\n(?!\s*$)");
        assert_eq!(matched(&breaks.br, "\nnext"), Some("\n"));
        assert_eq!(matched(&Grammar::get(GrammarKind::Gfm).br, "\nnext"), None);
        assert_eq!(matched(&breaks.text, "one\ntwo"), Some("one"));
    }

    #[test]
    fn test_only_gfm_family_has_url_and_del() {
        assert!(!Grammar::get(GrammarKind::Standard).is_gfm());
        assert!(!Grammar::get(GrammarKind::Pedantic).is_gfm());
        assert!(Grammar::get(GrammarKind::Gfm).del.is_some());
        assert!(Grammar::get(GrammarKind::GfmBreaks).url.is_some());
    }

    #[test]
    fn test_pedantic_overrides_only_emphasis() {
        let standard = Grammar::get(GrammarKind::Standard);
        let pedantic = Grammar::get(GrammarKind::Pedantic);
        assert_ne!(standard.em.as_str(), pedantic.em.as_str());
        assert_ne!(standard.strong.as_str(), pedantic.strong.as_str());
        assert_eq!(standard.link.as_str(), pedantic.link.as_str());
        assert_eq!(matched(&standard.em, "* a *"), Some("* a *"));
        assert_eq!(matched(&pedantic.em, "* a *"), None);
    }

    #[test]
    fn test_word_characters_are_ascii() {
        let grammar = Grammar::get(GrammarKind::Standard);
        assert_eq!(matched(&grammar.tag, "<é>"), None);
        assert_eq!(matched(&grammar.tag, "<b_1>"), Some("<b_1>"));
        assert_eq!(matched(&grammar.em, "_a_é"), Some("_a_"));
        assert_eq!(matched(&grammar.em, "_a_b"), None);
    }

    #[test]
    fn test_link_text_run_does_not_exhaust_stack() {
        let grammar = Grammar::get(GrammarKind::Standard);
        let text = "a".repeat(1_100_000);
        assert_eq!(matched(&grammar.link, &format!("[{text}")), None);

        let link = format!("[{text}](/u)");
        assert_eq!(matched(&grammar.link, &link), Some(link.as_str()));
    }

    #[test]
    fn test_code_requires_matching_fence() {
        let grammar = Grammar::get(GrammarKind::Standard);
        assert_eq!(matched(&grammar.code, "`` a`b `` rest"), Some("`` a`b ``"));
        assert_eq!(matched(&grammar.code, "`open"), None);
    }

    #[test]
    fn test_rules_listed_in_cascade_order() {
        let names: Vec<_> = Grammar::get(GrammarKind::Gfm)
            .rules()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            [
                "escape", "autolink", "url", "tag", "link", "reflink", "nolink", "strong", "em",
                "code", "br", "del", "text"
            ]
        );
        assert_eq!(Grammar::get(GrammarKind::Standard).rules().len(), 11);
    }
}
