//! `wordlist`: count the words of one or more text files and report on them.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use avl_wordlist::WordList;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wordlist", version, about = "Word frequency statistics over whitespace-separated text")]
struct Cli {
    /// Input files; `-` reads standard input.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Print every word with its count, in ascending order.
    #[arg(long)]
    words: bool,

    /// Remove a word before reporting. May be repeated.
    #[arg(long, value_name = "WORD")]
    remove: Vec<String>,

    /// Print the count of a word. May be repeated.
    #[arg(long, value_name = "WORD")]
    count: Vec<String>,

    /// Print the root of the tree and its children.
    #[arg(long)]
    show_root: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "WORDLIST_LOG", default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("unable to read standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("unable to open {}", path.display()))
}

fn show_root(out: &mut impl Write, list: &WordList) -> io::Result<()> {
    let Some(root) = list.root() else {
        return writeln!(out, "(empty)");
    };
    writeln!(out, "root: {}", root.word())?;
    if let Some(left) = root.left() {
        writeln!(out, "root->left: {}", left.word())?;
    }
    if let Some(right) = root.right() {
        writeln!(out, "root->right: {}", right.word())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut list = WordList::new();
    for path in &cli.files {
        let text = read_input(path)?;
        let before = list.total_words();
        list.extend(text.split_whitespace());
        tracing::info!(
            file = %path.display(),
            words = list.total_words() - before,
            "loaded"
        );
    }

    for word in &cli.remove {
        if !list.remove(word) {
            tracing::warn!(word = %word, "not in the word list");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.words {
        write!(out, "{}", list.listing())?;
    }

    for word in &cli.count {
        writeln!(out, "{}: {}", word, list.get_count(word))?;
    }

    if cli.show_root {
        show_root(&mut out, &list)?;
    }

    if list.is_empty() {
        writeln!(out, "No words.")?;
    } else {
        write!(out, "{}", list.statistics()?)?;
    }

    Ok(())
}
