use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;

use inkdown::{Config, Grammar, GrammarKind, InlineLexer, Links};

mod cli;
use cli::{Cli, Commands, RenderOptions, VariantArg};

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, file: &Option<PathBuf>) -> io::Result<Config> {
    let start_dir = start_dir_for(file)?;
    let (cfg, cfg_path) = inkdown::config::load(explicit, &start_dir)?;

    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }
    Ok(cfg)
}

fn apply_options(mut cfg: Config, options: &RenderOptions) -> Config {
    if options.gfm {
        cfg.gfm = true;
    }
    if options.no_gfm {
        cfg.gfm = false;
    }
    cfg.breaks |= options.breaks;
    cfg.pedantic |= options.pedantic;
    cfg.sanitize |= options.sanitize;
    cfg.smartypants |= options.smartypants;
    cfg.xhtml |= options.xhtml;
    if options.no_mangle {
        cfg.mangle = false;
    }
    if let Some(depth) = options.max_nesting {
        cfg.max_nesting = depth;
    }
    cfg
}

fn read_links(path: Option<&PathBuf>) -> io::Result<Links> {
    let Some(path) = path else {
        return Ok(Links::new());
    };
    log::debug!("Reading link references from: {}", path.display());
    let s = fs::read_to_string(path)?;
    toml::from_str::<Links>(&s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid links file {}: {e}", path.display()),
        )
    })
}

fn variant_kind(variant: VariantArg) -> GrammarKind {
    match variant {
        VariantArg::Standard => GrammarKind::Standard,
        VariantArg::Pedantic => GrammarKind::Pedantic,
        VariantArg::Gfm => GrammarKind::Gfm,
        VariantArg::Breaks => GrammarKind::GfmBreaks,
    }
}

#[derive(Serialize)]
struct RuleRow<'a> {
    name: &'a str,
    pattern: &'a str,
}

#[derive(Serialize)]
struct GrammarDump<'a> {
    variant: &'a str,
    rules: Vec<RuleRow<'a>>,
}

fn print_grammar(grammar: &Grammar, json: bool) -> io::Result<()> {
    let rules = grammar.rules();
    if json {
        let dump = GrammarDump {
            variant: grammar.kind.name(),
            rules: rules
                .iter()
                .map(|&(name, pattern)| RuleRow { name, pattern })
                .collect(),
        };
        let out = serde_json::to_string_pretty(&dump).map_err(io::Error::other)?;
        println!("{out}");
    } else {
        for (name, pattern) in rules {
            println!("{name:<8} {pattern}");
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            file,
            links,
            options,
        } => {
            let cfg = apply_options(load_config(cli.config.as_deref(), &file)?, &options);
            let links = read_links(links.as_ref())?;

            let input = read_all(file.as_ref())?;
            let input = input
                .strip_suffix("\r\n")
                .or_else(|| input.strip_suffix('\n'))
                .unwrap_or(&input);

            match InlineLexer::new(&links, &cfg).output(input) {
                Ok(html) => println!("{html}"),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Grammar { variant, json } => {
            let kind = match variant {
                Some(variant) => variant_kind(variant),
                None => load_config(cli.config.as_deref(), &None)?.grammar_kind(),
            };
            print_grammar(Grammar::get(kind), json)
        }
    }
}
