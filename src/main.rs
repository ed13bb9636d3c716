use anyhow::{Context, Result};
use book::Book;
use cli::Cli;
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use sinks::{Epub, Package, Render, Sink};
use source::Source;
use std::path::Path;
use std::process::ExitCode;

mod book;
mod cli;
mod config;
mod config_wizard;
mod markup;
mod sinks;
mod source;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match &cli.command {
        cli::Commands::Config => config_wizard::run(&cli.dir),
        cli::Commands::Render => render(&cli.dir),
        cli::Commands::Outline => {
            let (_, book) = load(&cli.dir, &ProgressBar::hidden())?;
            let outline = serde_json::to_string_pretty(&book.outline())
                .with_context(|| "Failed to serialize outline")?;
            println!("{outline}");
            Ok(())
        }
    }
}

/// Load the configuration and parse every chapter of the book in `dir`.
fn load(dir: &Path, progress: &ProgressBar) -> Result<(Configuration, Book)> {
    let config = Configuration::load(dir)?;
    let source = Source::load(dir, &config)?;
    progress.set_length(source.chapters.len() as u64);
    let book = Book::assemble(&config, &source, progress)?;
    Ok((config, book))
}

fn render(dir: &Path) -> Result<()> {
    println!("Loading configuration...");
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );

    let (config, book) = load(dir, &progress)?;
    progress.finish_with_message("Chapters parsed");

    let mut sinks = vec![Sink::Package(Package {
        output: dir.join(&config.output),
    })];
    if let Some(epub) = &config.epub {
        sinks.push(Sink::Epub(Epub {
            outfile: dir.join(&epub.outfile),
        }));
    }
    for sink in &sinks {
        sink.render(&book).with_context(|| "Failed to render book")?;
    }

    println!();
    println!("  Chapters:  {}", book.chapters.len());
    println!(
        "  Sections:  {}",
        book.chapters.iter().map(|c| c.sections.len()).sum::<usize>()
    );
    println!("  Package:   {}", dir.join(&config.output).join(format!("{}.opf", config.name)).display());
    if let Some(epub) = &config.epub {
        println!("  EPUB:      {}", dir.join(&epub.outfile).display());
    }

    Ok(())
}
