use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::grammar::GrammarKind;

/// Inline compilation options.
///
/// Function-valued options (escaping, sanitizing) live in [`crate::Hooks`];
/// everything here can be read from a TOML file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// GitHub Flavored Markdown: bare URLs, `~~strikethrough~~`, `\~` escapes
    pub gfm: bool,
    /// With `gfm`, every newline becomes a line break
    pub breaks: bool,
    /// Stricter emphasis delimiters (ignored when `gfm` is set)
    pub pedantic: bool,
    /// Escape raw HTML and refuse script-like link protocols
    pub sanitize: bool,
    /// Obfuscate e-mail autolinks with character references
    pub mangle: bool,
    /// Typographic quotes, dashes and ellipses in plain text
    pub smartypants: bool,
    /// Self-closing void elements (`<br/>`, `<img .../>`)
    pub xhtml: bool,
    /// Deepest nesting of emphasis/link content that is still scanned for
    /// inline syntax; anything deeper is emitted as plain text
    pub max_nesting: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: false,
            pedantic: false,
            sanitize: false,
            mangle: true,
            smartypants: false,
            xhtml: false,
            max_nesting: 64,
        }
    }
}

impl Config {
    /// The grammar variant these options select. `gfm` takes priority over
    /// `pedantic`.
    pub fn grammar_kind(&self) -> GrammarKind {
        if self.gfm {
            if self.breaks {
                GrammarKind::GfmBreaks
            } else {
                GrammarKind::Gfm
            }
        } else if self.pedantic {
            GrammarKind::Pedantic
        } else {
            GrammarKind::Standard
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn gfm(mut self, gfm: bool) -> Self {
        self.config.gfm = gfm;
        self
    }

    pub fn breaks(mut self, breaks: bool) -> Self {
        self.config.breaks = breaks;
        self
    }

    pub fn pedantic(mut self, pedantic: bool) -> Self {
        self.config.pedantic = pedantic;
        self
    }

    pub fn sanitize(mut self, sanitize: bool) -> Self {
        self.config.sanitize = sanitize;
        self
    }

    pub fn mangle(mut self, mangle: bool) -> Self {
        self.config.mangle = mangle;
        self
    }

    pub fn smartypants(mut self, smartypants: bool) -> Self {
        self.config.smartypants = smartypants;
        self
    }

    pub fn xhtml(mut self, xhtml: bool) -> Self {
        self.config.xhtml = xhtml;
        self
    }

    pub fn max_nesting(mut self, depth: usize) -> Self {
        self.config.max_nesting = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".inkdown.toml", "inkdown.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn user_config_path() -> Option<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    [xdg, dirs::config_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join("inkdown").join("config.toml"))
        .find(|p| p.is_file())
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .inkdown.toml, inkdown.toml
/// 3) user config: $XDG_CONFIG_HOME/inkdown/config.toml or the platform config dir
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir)
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    if let Some(p) = user_config_path()
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
