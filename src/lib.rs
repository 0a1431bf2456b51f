pub mod config;
pub mod error;
pub mod grammar;
pub mod helpers;
pub mod hooks;
pub mod inline_lexer;
pub mod renderer;
pub mod transforms;

pub use config::Config;
pub use config::ConfigBuilder;
pub use error::{GrammarError, InlineError};
pub use grammar::{Grammar, GrammarKind};
pub use hooks::Hooks;
pub use inline_lexer::{InlineLexer, Link, Links};
pub use renderer::{HtmlRenderer, Renderer};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compiles an inline Markdown fragment to HTML.
///
/// Reference-style links are resolved against `links`. The grammar variant and
/// output options come from `config`; escaping uses the default [`Hooks`] and
/// markup comes from the [`HtmlRenderer`].
///
/// # Examples
///
/// ```rust
/// use inkdown::{Config, Link, Links, render_inline};
///
/// let mut links = Links::new();
/// links.insert("home", Link::new("https://example.com", None));
///
/// let html = render_inline("**Go** [home]", &links, &Config::default()).unwrap();
/// assert_eq!(html, "<strong>Go</strong> <a href=\"https://example.com\">home</a>");
/// ```
///
/// # Errors
///
/// Returns [`InlineError`] if no rule matches at some position, which only
/// happens with a broken grammar.
pub fn render_inline(src: &str, links: &Links, config: &Config) -> Result<String, InlineError> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    InlineLexer::new(links, config).output(src)
}

/// Like [`render_inline`] with no link references and the default config.
pub fn render_inline_with_defaults(src: &str) -> Result<String, InlineError> {
    render_inline(src, &Links::new(), &Config::default())
}
