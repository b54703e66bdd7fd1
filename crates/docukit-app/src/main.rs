// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docukit — text statistics, Markdown to PDF, and image merging.
//
// Entry point. Initialises logging, loads the session, and dispatches the
// subcommand. Errors are shown as plain-language notifications on stderr and
// turn into a non-zero exit status.

mod cli;
mod services;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use docukit_core::error::{DocukitError, Result};
use docukit_core::human_errors::{Severity, humanize_error};
use docukit_document::TextStatistics;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ConfigArgs, ImagesArgs, MarkdownArgs, StatsArgs};
use services::session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            notify(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut session = Session::load(cli.config)?;
    match cli.command {
        Command::Stats(args) => stats(&mut session, args).await,
        Command::Markdown(args) => markdown(&mut session, args).await,
        Command::Images(args) => images(&mut session, args).await,
        Command::Config(args) => config(&session, args),
    }
}

async fn stats(session: &mut Session, args: StatsArgs) -> Result<()> {
    if let Some(wpm) = args.wpm {
        session.config_mut().words_per_minute = wpm;
    }
    if let Some(mode) = args.sentences {
        session.config_mut().sentence_counting = mode.into();
    }
    session.config().validate()?;

    let text = match args.file.as_ref().filter(|_| !args.reads_stdin()) {
        Some(path) => {
            let upload = Session::read_upload(path).await?;
            String::from_utf8(upload.bytes).map_err(|err| {
                DocukitError::Read(format!("{} is not valid UTF-8: {}", upload.name, err))
            })?
        }
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    let statistics = session.statistics(&text);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&statistics)?);
    } else {
        print_statistics(&statistics);
    }
    Ok(())
}

fn print_statistics(stats: &TextStatistics) {
    println!("Characters:    {}", stats.character_count);
    println!("Words:         {}", stats.word_count);
    println!("Sentences:     {}", stats.sentence_count);
    println!("Paragraphs:    {}", stats.paragraph_count);
    println!("Reading time:  {} min", stats.reading_time_minutes);
}

async fn markdown(session: &mut Session, args: MarkdownArgs) -> Result<()> {
    if let Some(paper) = args.paper {
        session.config_mut().paper_size = paper;
    }
    session.config().validate()?;

    let upload = Session::read_upload(&args.file).await?;
    let bytes = session.convert_markdown(&upload, args.title.as_deref())?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&session.config().markdown_output));
    let pages = Session::write_pdf(&output, &bytes).await?;
    println!("Wrote {} ({} pages)", output.display(), pages);
    Ok(())
}

async fn images(session: &mut Session, args: ImagesArgs) -> Result<()> {
    if let Some(paper) = args.paper {
        session.config_mut().paper_size = paper;
    }
    session.config().validate()?;

    let uploads = Session::read_uploads(&args.files).await?;
    let report = session.add_images(uploads);
    for err in &report.rejected {
        notify(err);
    }

    for name in &args.remove {
        if !session.remove_image(name) {
            eprintln!("Note: \"{name}\" is not in the list, nothing removed.");
        }
    }
    for spec in &args.moves {
        if !session.move_image(&spec.name, spec.index) {
            eprintln!("Note: \"{}\" is not in the list, nothing moved.", spec.name);
        }
    }

    tracing::info!(
        count = session.images().len(),
        order = ?session.image_names(),
        "merging images"
    );
    let bytes = session.merge_images(args.title.as_deref())?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&session.config().images_output));
    let pages = Session::write_pdf(&output, &bytes).await?;
    println!("Wrote {} ({} pages)", output.display(), pages);
    Ok(())
}

fn config(session: &Session, args: ConfigArgs) -> Result<()> {
    if args.init {
        session.save_config()?;
        println!("Wrote {}", session.config_path().display());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(session.config())?);
    Ok(())
}

/// Print a plain-language notification for `err` on stderr.
fn notify(err: &DocukitError) {
    let human = humanize_error(err);
    let label = match human.severity {
        Severity::Skipped => "Skipped",
        Severity::ActionRequired => "Nothing to do",
        Severity::Failed => "Error",
    };
    eprintln!("{label}: {}", human.message);
    eprintln!("  {}", human.suggestion);
}
