// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use docukit_core::types::{PaperSize, SentenceCounting};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Statistics for a file, or for whatever is piped in
  docukit stats essay.txt
  cat essay.txt | docukit stats --json

  # Markdown to PDF
  docukit markdown notes.md -o notes.pdf --title "Meeting notes"

  # Several images, one per page, with the last one moved to the front
  docukit images scan1.png scan2.png cover.jpg --move cover.jpg=0

CONFIGURATION:
  Settings are read from $XDG_CONFIG_HOME/docukit/config.json
  (~/.config/docukit/config.json when XDG_CONFIG_HOME is unset).
  `docukit config --init` writes the defaults there.

ENVIRONMENT VARIABLES:
  RUST_LOG          Log filter, e.g. `debug` or `docukit_document=debug`
  DOCUKIT_CONFIG    Path to an alternative config file
"#;

/// Text statistics, Markdown to PDF, and image merging.
#[derive(Parser, Debug)]
#[command(
    name = "docukit",
    version,
    about = "Text statistics, Markdown to PDF, and image merging",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true, env = "DOCUKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count characters, words, sentences, and paragraphs.
    Stats(StatsArgs),
    /// Convert a .md or .txt file to PDF.
    Markdown(MarkdownArgs),
    /// Merge images into a PDF, one image per page.
    Images(ImagesArgs),
    /// Print the effective configuration, or write it with --init.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Text file to analyse; stdin when absent or `-`.
    pub file: Option<PathBuf>,

    /// Print the statistics as JSON.
    #[arg(long)]
    pub json: bool,

    /// Sentence counting rule.
    #[arg(long, value_enum)]
    pub sentences: Option<SentenceArg>,

    /// Reading speed in words per minute.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub wpm: Option<u32>,
}

impl StatsArgs {
    /// Whether the text comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.file
            .as_ref()
            .is_none_or(|path| path.as_os_str() == "-")
    }
}

#[derive(Args, Debug)]
pub struct MarkdownArgs {
    /// Markdown or plain text file.
    pub file: PathBuf,

    /// Output PDF path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Title stored in the PDF metadata.
    #[arg(long)]
    pub title: Option<String>,

    /// Paper size: a4, a3, a5, letter, legal.
    #[arg(long, value_parser = parse_paper)]
    pub paper: Option<PaperSize>,
}

#[derive(Args, Debug)]
pub struct ImagesArgs {
    /// Image files, in page order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output PDF path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Title stored in the PDF metadata.
    #[arg(long)]
    pub title: Option<String>,

    /// Drop an image (by file name) before merging. Repeatable.
    #[arg(long, value_name = "NAME")]
    pub remove: Vec<String>,

    /// Move an image to a new position, e.g. `cover.jpg=0`. Repeatable.
    #[arg(long = "move", value_name = "NAME=INDEX")]
    pub moves: Vec<MoveSpec>,

    /// Paper size: a4, a3, a5, letter, legal.
    #[arg(long, value_parser = parse_paper)]
    pub paper: Option<PaperSize>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file.
    #[arg(long)]
    pub init: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentenceArg {
    PerLine,
    TerminatorRuns,
}

impl From<SentenceArg> for SentenceCounting {
    fn from(v: SentenceArg) -> Self {
        match v {
            SentenceArg::PerLine => SentenceCounting::PerLine,
            SentenceArg::TerminatorRuns => SentenceCounting::TerminatorRuns,
        }
    }
}

/// `NAME=INDEX` argument of `images --move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSpec {
    pub name: String,
    pub index: usize,
}

impl FromStr for MoveSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split on the last '=' so names may contain one.
        let (name, index) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected NAME=INDEX, got `{s}`"))?;
        if name.is_empty() {
            return Err("image name is empty".into());
        }
        let index = index
            .trim()
            .parse()
            .map_err(|_| format!("`{index}` is not a position"))?;
        Ok(Self {
            name: name.to_owned(),
            index,
        })
    }
}

fn parse_paper(s: &str) -> Result<PaperSize, String> {
    PaperSize::from_keyword(s)
        .ok_or_else(|| format!("unknown paper size `{s}` (try a4, a3, a5, letter, legal)"))
}
