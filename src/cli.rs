use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inkdown")]
#[command(author, version)]
#[command(about = "Compile inline Markdown to HTML")]
#[command(
    long_about = "Inkdown compiles inline Markdown (emphasis, code spans, links, images, \
    autolinks, raw HTML and line breaks) to HTML using an ordered cascade of rules. \
    Standard, pedantic and GitHub Flavored Markdown grammars are supported."
)]
#[command(after_help = "\
EXAMPLES:

    # Compile a fragment from a file
    inkdown render fragment.md

    # Compile from stdin
    echo '**bold** and `code`' | inkdown render

    # Resolve reference links from a table
    inkdown render --links links.toml fragment.md

    # Show the rule table of a grammar
    inkdown grammar --variant pedantic

CONFIGURATION:

Inkdown looks for configuration files in this order:
  1. Explicit --config path
  2. inkdown.toml or .inkdown.toml in current/parent directories
  3. ~/.config/inkdown/config.toml (XDG)
  4. Built-in defaults

Example .inkdown.toml:

    gfm = true
    smartypants = true
    mangle = false")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, inkdown will \
        search for .inkdown.toml or inkdown.toml in the current directory and its parents, \
        then fall back to ~/.config/inkdown/config.toml."
    )]
    pub config: Option<PathBuf>,
}

/// Grammar variants selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Standard,
    Pedantic,
    Gfm,
    Breaks,
}

/// Option overrides layered on top of the loaded configuration.
#[derive(clap::Args, Debug, Default)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown
    #[arg(long, overrides_with = "no_gfm")]
    pub gfm: bool,

    /// Disable GitHub Flavored Markdown
    #[arg(long, overrides_with = "gfm")]
    pub no_gfm: bool,

    /// Turn every newline into a line break (with GFM)
    #[arg(long)]
    pub breaks: bool,

    /// Use the stricter emphasis rules
    #[arg(long)]
    pub pedantic: bool,

    /// Escape raw HTML and drop script-like links
    #[arg(long)]
    pub sanitize: bool,

    /// Emit e-mail autolinks without obfuscation
    #[arg(long)]
    pub no_mangle: bool,

    /// Typographic quotes, dashes and ellipses
    #[arg(long)]
    pub smartypants: bool,

    /// Self-closing void elements
    #[arg(long)]
    pub xhtml: bool,

    /// Maximum nesting depth of compiled inline content
    #[arg(long, value_name = "DEPTH")]
    pub max_nesting: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile an inline Markdown fragment to HTML
    #[command(
        long_about = "Compile an inline Markdown fragment to HTML and print it to stdout. \
        A single trailing newline of the input is ignored. Reference-style links are resolved \
        against the table given with --links."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Compile a file
    inkdown render fragment.md

    # Compile from stdin with smart punctuation
    echo '\"Quoted\" -- text' | inkdown render --smartypants

LINK TABLES:

A links file maps reference labels to destinations:

    [\"rust lang\"]
    href = \"https://www.rust-lang.org\"
    title = \"Rust\"

Labels are matched case-insensitively, with runs of whitespace collapsed.")]
    Render {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        #[arg(long_help = "Path to the input fragment. If not provided, reads from stdin.")]
        file: Option<PathBuf>,

        /// Link reference table (TOML)
        #[arg(long, value_name = "LINKS")]
        links: Option<PathBuf>,

        #[command(flatten)]
        options: RenderOptions,
    },
    /// Print the rule table of a grammar variant
    #[command(
        long_about = "Print the rules of a grammar variant in the order they are tried, \
        one rule per line as name and pattern. Without --variant, the variant selected by \
        the configuration is shown."
    )]
    Grammar {
        /// Grammar variant to show
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
