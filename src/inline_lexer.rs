//! Inline lexer and compiler.
//!
//! [`InlineLexer::output`] walks a fragment left to right. At every step the
//! rules are tried in a fixed priority order against the unconsumed suffix;
//! the first match consumes its prefix, renders it, and the cascade restarts
//! from the top:
//!
//! 1. escape, 2. autolink, 3. bare URL (GFM), 4. raw HTML tag,
//! 5. inline link/image, 6. reference link/image, 7. strong, 8. em,
//! 9. code span, 10. line break, 11. strikethrough (GFM), 12. text.
//!
//! Constructs with inline content (emphasis, strikethrough, link text) compile
//! that content with fresh per-call state, and the result is passed to a
//! single renderer call.

use std::borrow::Cow;

use fancy_regex::{Captures, Regex, RuntimeError};

use crate::config::Config;
use crate::error::InlineError;
use crate::grammar::Grammar;
use crate::hooks::Hooks;
use crate::renderer::{HtmlRenderer, Renderer};
use crate::transforms::{mangle, smartypants};

pub mod links;

pub use links::{Link, Links};

/// State of one compilation call. Owned by a single frame; nested
/// compilations get their own.
struct Compilation<'s> {
    src: &'s str,
    pos: usize,
    out: String,
    in_link: bool,
    depth: usize,
}

impl<'s> Compilation<'s> {
    fn new(src: &'s str, in_link: bool, depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            out: String::with_capacity(src.len()),
            in_link,
            depth,
        }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn is_done(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn advance(&mut self, len: usize) {
        self.pos += len;
    }

    fn push(&mut self, html: &str) {
        self.out.push_str(html);
    }
}

fn group<'t>(caps: &Captures<'t>, idx: usize) -> Option<&'t str> {
    caps.get(idx).map(|m| m.as_str())
}

/// First non-empty capture among `idx`, in order.
fn first_group<'t>(caps: &Captures<'t>, idx: &[usize]) -> &'t str {
    idx.iter()
        .filter_map(|&i| group(caps, i))
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

pub struct InlineLexer<'a> {
    links: &'a Links,
    config: &'a Config,
    grammar: &'a Grammar,
    hooks: Hooks,
    renderer: Box<dyn Renderer + 'a>,
    default_renderer: bool,
}

impl<'a> InlineLexer<'a> {
    /// A lexer using the grammar selected by `config`, the default hooks and
    /// the [`HtmlRenderer`].
    pub fn new(links: &'a Links, config: &'a Config) -> Self {
        let hooks = Hooks::default();
        Self {
            links,
            config,
            grammar: Grammar::get(config.grammar_kind()),
            renderer: Box::new(HtmlRenderer::new(config, &hooks)),
            hooks,
            default_renderer: true,
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        if self.default_renderer {
            self.renderer = Box::new(HtmlRenderer::new(self.config, &hooks));
        }
        self.hooks = hooks;
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'a) -> Self {
        self.renderer = Box::new(renderer);
        self.default_renderer = false;
        self
    }

    /// Replace the grammar selected by the config.
    pub fn with_grammar(mut self, grammar: &'a Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        self.grammar
    }

    /// Compile `src` to rendered output.
    pub fn output(&self, src: &str) -> Result<String, InlineError> {
        self.compile(src, false, 0)
    }

    fn compile(&self, src: &str, in_link: bool, depth: usize) -> Result<String, InlineError> {
        log::trace!(
            "Compiling {:?} at depth {} ({} bytes, in_link={})",
            src.chars().take(32).collect::<String>(),
            depth,
            src.len(),
            in_link
        );
        let mut state = Compilation::new(src, in_link, depth);

        while !state.is_done() {
            let matched = self.try_escape(&mut state)?
                || self.try_autolink(&mut state)?
                || self.try_url(&mut state)?
                || self.try_tag(&mut state)?
                || self.try_link(&mut state)?
                || self.try_reflink(&mut state)?
                || self.try_strong(&mut state)?
                || self.try_em(&mut state)?
                || self.try_code(&mut state)?
                || self.try_br(&mut state)?
                || self.try_del(&mut state)?
                || self.try_text(&mut state)?;

            if !matched {
                let code = state.rest().chars().next().map_or(0, u32::from);
                return Err(InlineError::InfiniteLoop {
                    code,
                    offset: state.pos,
                });
            }
        }

        Ok(state.out)
    }

    /// Compile nested content one level deeper, or flatten it to text once
    /// `max_nesting` is exceeded.
    fn nested(&self, src: &str, in_link: bool, depth: usize) -> Result<String, InlineError> {
        if depth > self.config.max_nesting {
            log::warn!(
                "Inline nesting exceeds {} levels; emitting content as text",
                self.config.max_nesting
            );
            return Ok(self.renderer.text(&self.hooks.escape(src, false)));
        }
        self.compile(src, in_link, depth)
    }

    /// Run `re` against the remaining input. Zero-width matches count as no
    /// match so that every accepted rule consumes input.
    ///
    /// A rule that runs out of backtracking stack is skipped at this offset,
    /// so the cascade moves on to the next rule.
    fn exec<'s>(
        &self,
        rule: &'static str,
        re: &Regex,
        state: &Compilation<'s>,
    ) -> Result<Option<Captures<'s>>, InlineError> {
        let caps = match re.captures(state.rest()) {
            Ok(caps) => caps,
            Err(fancy_regex::Error::RuntimeError(RuntimeError::StackOverflow)) => {
                log::warn!(
                    "Rule {} exhausted the backtracking stack at offset {}; skipping it",
                    rule,
                    state.pos
                );
                None
            }
            Err(source) => return Err(InlineError::Regex { rule, source }),
        };
        Ok(caps.filter(|caps| caps.get(0).is_some_and(|m| !m.as_str().is_empty())))
    }

    fn try_escape(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("escape", &self.grammar.escape, state)? else {
            return Ok(false);
        };
        log::debug!("Matched escape at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        state.advance(whole.len());
        state.push(first_group(&caps, &[1]));
        Ok(true)
    }

    fn try_autolink(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("autolink", &self.grammar.autolink, state)? else {
            return Ok(false);
        };
        log::debug!("Matched autolink at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        let target = first_group(&caps, &[1]);

        let (href, text) = if group(&caps, 2) == Some("@") {
            let address = if target.as_bytes().get(6) == Some(&b':') {
                &target[7..]
            } else {
                target
            };
            let text = self.hooks.escape(&self.mangle(address), false);
            (format!("{}{}", self.mangle("mailto:"), text), text)
        } else {
            let text = self.hooks.escape(target, false);
            (text.clone(), text)
        };

        state.advance(whole.len());
        state.push(&self.renderer.link(&href, None, &text));
        Ok(true)
    }

    fn try_url(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        if state.in_link {
            return Ok(false);
        }
        let Some(url) = &self.grammar.url else {
            return Ok(false);
        };
        let Some(caps) = self.exec("url", url, state)? else {
            return Ok(false);
        };
        log::debug!("Matched bare URL at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        let text = self.hooks.escape(first_group(&caps, &[1]), false);

        state.advance(whole.len());
        state.push(&self.renderer.link(&text, None, &text));
        Ok(true)
    }

    fn try_tag(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("tag", &self.grammar.tag, state)? else {
            return Ok(false);
        };
        let tag = first_group(&caps, &[0]);
        log::debug!("Matched raw HTML at offset {}", state.pos);

        if !state.in_link && starts_with_ignore_case(tag, "<a ") {
            log::debug!("Entering link context via raw anchor");
            state.in_link = true;
        } else if state.in_link && starts_with_ignore_case(tag, "</a>") {
            log::debug!("Leaving link context via raw anchor");
            state.in_link = false;
        }

        state.advance(tag.len());
        if self.config.sanitize {
            state.push(&self.hooks.sanitize(tag));
        } else {
            state.push(tag);
        }
        Ok(true)
    }

    fn try_link(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("link", &self.grammar.link, state)? else {
            return Ok(false);
        };
        let whole = first_group(&caps, &[0]);
        let is_image = whole.starts_with('!');
        if state.in_link && !is_image {
            return Ok(false);
        }
        log::debug!("Matched inline link at offset {}", state.pos);

        let link = Link {
            href: first_group(&caps, &[2]).to_string(),
            title: group(&caps, 3).map(String::from),
        };
        state.advance(whole.len());
        let html = self.output_link(first_group(&caps, &[1]), is_image, &link, state.depth)?;
        state.push(&html);
        Ok(true)
    }

    fn try_reflink(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let caps = match self.exec("reflink", &self.grammar.reflink, state)? {
            Some(caps) => caps,
            None => match self.exec("nolink", &self.grammar.nolink, state)? {
                Some(caps) => caps,
                None => return Ok(false),
            },
        };
        let whole = first_group(&caps, &[0]);
        let is_image = whole.starts_with('!');
        if state.in_link && !is_image {
            return Ok(false);
        }

        let key = first_group(&caps, &[2, 1]);
        let link = self.links.get(key).filter(|link| !link.href.is_empty());
        let Some(link) = link else {
            log::debug!(
                "Unresolved reference {:?} at offset {}, emitting literal",
                key,
                state.pos
            );
            let first = whole.chars().next().map_or(1, char::len_utf8);
            state.push(&whole[..first]);
            state.advance(first);
            return Ok(true);
        };
        log::debug!("Matched reference link {:?} at offset {}", key, state.pos);

        state.advance(whole.len());
        let html = self.output_link(first_group(&caps, &[1]), is_image, link, state.depth)?;
        state.push(&html);
        Ok(true)
    }

    fn try_strong(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("strong", &self.grammar.strong, state)? else {
            return Ok(false);
        };
        log::debug!("Matched strong at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        state.advance(whole.len());
        let inner = self.nested(first_group(&caps, &[2, 1]), state.in_link, state.depth + 1)?;
        state.push(&self.renderer.strong(&inner));
        Ok(true)
    }

    fn try_em(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("em", &self.grammar.em, state)? else {
            return Ok(false);
        };
        log::debug!("Matched em at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        state.advance(whole.len());
        let inner = self.nested(first_group(&caps, &[2, 1]), state.in_link, state.depth + 1)?;
        state.push(&self.renderer.em(&inner));
        Ok(true)
    }

    fn try_code(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("code", &self.grammar.code, state)? else {
            return Ok(false);
        };
        log::debug!("Matched code span at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        let code = self.hooks.escape(first_group(&caps, &[2]).trim(), true);
        state.advance(whole.len());
        state.push(&self.renderer.codespan(&code));
        Ok(true)
    }

    fn try_br(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("br", &self.grammar.br, state)? else {
            return Ok(false);
        };
        log::debug!("Matched line break at offset {}", state.pos);
        state.advance(first_group(&caps, &[0]).len());
        state.push(&self.renderer.br());
        Ok(true)
    }

    fn try_del(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(del) = &self.grammar.del else {
            return Ok(false);
        };
        let Some(caps) = self.exec("del", del, state)? else {
            return Ok(false);
        };
        log::debug!("Matched strikethrough at offset {}", state.pos);
        let whole = first_group(&caps, &[0]);
        state.advance(whole.len());
        let inner = self.nested(first_group(&caps, &[1]), state.in_link, state.depth + 1)?;
        state.push(&self.renderer.del(&inner));
        Ok(true)
    }

    fn try_text(&self, state: &mut Compilation<'_>) -> Result<bool, InlineError> {
        let Some(caps) = self.exec("text", &self.grammar.text, state)? else {
            return Ok(false);
        };
        let text = first_group(&caps, &[0]);
        state.advance(text.len());
        let text = self.hooks.escape(&self.smartypants(text), false);
        state.push(&self.renderer.text(&text));
        Ok(true)
    }

    /// Render a resolved link or image. Link text is compiled in link
    /// context; image alt text is only escaped.
    fn output_link(
        &self,
        text: &str,
        is_image: bool,
        link: &Link,
        depth: usize,
    ) -> Result<String, InlineError> {
        let href = self.hooks.escape(&link.href, false);
        let title = link
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .map(|title| self.hooks.escape(title, false));

        if is_image {
            let alt = self.hooks.escape(text, false);
            return Ok(self.renderer.image(&href, title.as_deref(), &alt));
        }
        let text = self.nested(text, true, depth + 1)?;
        Ok(self.renderer.link(&href, title.as_deref(), &text))
    }

    fn smartypants<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.config.smartypants {
            Cow::Owned(smartypants(text))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn mangle<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.config.mangle {
            Cow::Owned(mangle(text))
        } else {
            Cow::Borrowed(text)
        }
    }
}
