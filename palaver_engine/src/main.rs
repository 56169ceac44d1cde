#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Palaver **
//! Terminal player for branching dialogue exports

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use log::info;

use palaver_engine::console::run_console;
use palaver_engine::data_paths::default_config_path;
use palaver_engine::style::DialogStyle;
use palaver_engine::{Conversation, Document, EntryPoint, NodeRef, PALAVER_VERSION, WordOverrides, load_config};

#[derive(Debug, Parser)]
#[command(name = "palaver", version, about = "Play a node-graph or hypertext dialogue export in the terminal")]
struct Cli {
    /// Dialogue export (JSON) to play
    path: PathBuf,

    /// Conversation id to start in (node-graph exports)
    #[arg(long, conflicts_with = "entry")]
    conversation: Option<i64>,

    /// Node id to start at within --conversation
    #[arg(long, requires = "conversation")]
    node: Option<i64>,

    /// Entry title to start at (hypertext exports)
    #[arg(long)]
    entry: Option<String>,

    /// Placeholder override, e.g. --word hero=Aria (repeatable)
    #[arg(long = "word", value_name = "NAME=VALUE", value_parser = parse_word)]
    words: Vec<(String, String)>,

    /// Engine configuration file [default: palaver.toml in the data directory]
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_word(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

fn entry_point(cli: &Cli, document: &Document) -> Result<EntryPoint> {
    match (document, cli.conversation, cli.entry.as_deref()) {
        (Document::ChatMap(map), Some(conversation_id), _) => match cli.node {
            Some(node_id) => Ok(EntryPoint::ChatMap(NodeRef::new(conversation_id, node_id))),
            None => map
                .conversation_entry(conversation_id)
                .map(EntryPoint::ChatMap)
                .ok_or_else(|| anyhow!("conversation {conversation_id} has no nodes")),
        },
        (Document::Twine(_), Some(_), _) => bail!("--conversation only applies to node-graph exports"),
        (_, None, Some(title)) => Ok(EntryPoint::Twine(title.to_string())),
        (_, None, None) => document.default_entry().context("the document contains no dialogue"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("palaver {PALAVER_VERSION} starting");

    let config = load_config(&cli.config.clone().unwrap_or_else(default_config_path));
    let document = Document::load(&cli.path).with_context(|| format!("while loading '{}'", cli.path.display()))?;
    let entry = entry_point(&cli, &document)?;
    let overrides: WordOverrides = cli.words.iter().cloned().collect();

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush()?;

    if let Document::ChatMap(map) = &document
        && !map.title.is_empty()
    {
        println!("{}\n", map.title.title_style());
    }

    let mut convo = Conversation::with_config(&document, config);
    let first = convo
        .start(entry.clone(), Some(overrides))
        .with_context(|| format!("while starting at {entry}"))?;
    info!("conversation started at {entry}");

    run_console(&mut convo, first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_parse_as_name_value() {
        assert_eq!(parse_word("hero=Aria"), Ok(("hero".into(), "Aria".into())));
        assert_eq!(parse_word("greeting=a=b"), Ok(("greeting".into(), "a=b".into())));
        assert!(parse_word("=Aria").is_err());
        assert!(parse_word("hero").is_err());
    }

    #[test]
    fn cli_rejects_node_without_conversation() {
        assert!(Cli::try_parse_from(["palaver", "talk.json", "--node", "3"]).is_err());
        assert!(Cli::try_parse_from(["palaver", "talk.json", "--conversation", "1", "--entry", "x"]).is_err());
        let cli = Cli::try_parse_from(["palaver", "talk.json", "--word", "a=b", "--word", "c=d"]).expect("parses");
        assert_eq!(cli.words.len(), 2);
    }
}
