//! Interactive configuration wizard for creating `plainbook.toml`.
//!
//! The wizard collects book metadata, the chapter list and output options
//! through a series of prompts. Chapter sources already present in the
//! source directory are offered for selection in file name order.

use crate::config::{Configuration, EpubConfig, MetadataBuilder, CONFIG_FILE};
use anyhow::{anyhow, Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};
use std::path::{Path, PathBuf};

/// Run the interactive configuration wizard.
///
/// Prompts the user for book metadata, chapters and outputs, then writes
/// `plainbook.toml` to the book directory.
pub fn run(dir: &Path) -> Result<()> {
    let theme = ColorfulTheme::default();

    if !dir.is_dir() {
        return Err(anyhow!("Path '{}' isn't a directory!", dir.display()));
    }

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!("{} already exists, overwrite it?", config_path.display()))
            .default(false)
            .interact()?
    {
        return Ok(());
    }

    let title: String = Input::with_theme(&theme)
        .with_prompt("Book title")
        .with_initial_text(detect_title(dir).unwrap_or_default())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;
    let creator: String = Input::with_theme(&theme)
        .with_prompt("Author")
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain author")?;
    let identifier: String = Input::with_theme(&theme)
        .with_prompt("ISBN or other unique identifier")
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain identifier")?;
    let language: String = Input::with_theme(&theme)
        .with_prompt("Language")
        .default("en".to_string())
        .interact()
        .with_context(|| "Failed to obtain language")?;
    let publisher: String = Input::with_theme(&theme)
        .with_prompt("Publisher (leave empty for none)")
        .allow_empty(true)
        .interact()?;
    let subject: String = Input::with_theme(&theme)
        .with_prompt("Subject (leave empty for none)")
        .allow_empty(true)
        .interact()?;
    let description: String = Input::with_theme(&theme)
        .with_prompt("Description (leave empty for none)")
        .allow_empty(true)
        .interact()?;
    let date: String = Input::with_theme(&theme)
        .with_prompt("Publication date")
        .default(chrono::Local::now().format("%Y-%m-%d").to_string())
        .interact()?;

    let meta = MetadataBuilder::default()
        .title(title.trim())
        .creator(creator.trim())
        .identifier(identifier.trim())
        .language(language.trim())
        .publisher(publisher.trim())
        .subject(subject.trim())
        .description(description.trim())
        .date(date.trim())
        .build()
        .with_context(|| "Failed to build metadata")?;

    let name: String = Input::with_theme(&theme)
        .with_prompt("Package name")
        .default(package_name(&meta.title))
        .interact()
        .with_context(|| "Failed to obtain package name")?;

    let mut config = Configuration::new(name.trim(), Vec::new(), meta);

    // offer the sources we can find, fall back to asking for them
    let detected = detect_chapters(&dir.join(&config.source_dir));
    if !detected.is_empty() {
        let defaults = vec![true; detected.len()];
        let selected = MultiSelect::with_theme(&theme)
            .with_prompt("Chapters to include (in reading order)")
            .items(&detected)
            .defaults(&defaults)
            .interact()?;
        config.chapters = selected.into_iter().map(|i| detected[i].clone()).collect();
    }
    if config.chapters.is_empty() {
        'chapters: loop {
            let chapter: String = Input::with_theme(&theme)
                .with_prompt(format!(
                    "Chapter source name in {} (leave blank to move on)",
                    config.source_dir.display()
                ))
                .allow_empty(true)
                .interact()?;
            if chapter.trim().is_empty() {
                break 'chapters;
            }
            config.chapters.push(chapter.trim().to_string());
        }
    }

    let output: String = Input::with_theme(&theme)
        .with_prompt("Output directory")
        .default("out".to_string())
        .interact()?;
    config.output = PathBuf::from(output.trim());

    let cover: String = Input::with_theme(&theme)
        .with_prompt(format!(
            "Cover image in {} (leave empty for none)",
            config.media_dir.display()
        ))
        .with_initial_text(config.cover.clone())
        .allow_empty(true)
        .interact()?;
    config.cover = cover.trim().to_string();

    if Confirm::with_theme(&theme)
        .with_prompt("Also package the book as an EPUB file?")
        .interact()?
    {
        let outfile: String = Input::with_theme(&theme)
            .with_prompt("EPUB output file")
            .default(format!("{}.epub", config.name))
            .interact()?;
        config.epub = Some(EpubConfig {
            outfile: PathBuf::from(outfile.trim()),
        });
    }

    let contents = toml::to_string(&config).with_context(|| "Failed to serialize configuration")?;
    std::fs::write(&config_path, contents)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Wrote {}", config_path.display());

    Ok(())
}

/// Detect a title from the directory name.
///
/// Transforms the directory name into a readable title by replacing
/// hyphens and underscores with spaces and capitalising each word.
fn detect_title(dir: &Path) -> Option<String> {
    let canonical = std::fs::canonicalize(dir).ok()?;
    let name = canonical.file_name()?.to_string_lossy().to_string();
    let title = name
        .split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    (!title.is_empty()).then_some(title)
}

/// A file-name-friendly package name derived from the title.
fn package_name(title: &str) -> String {
    let name = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if name.is_empty() {
        "book".to_string()
    } else {
        name
    }
}

/// Chapter identifiers of the `.txt` sources in `source_dir`, sorted by name.
fn detect_chapters(source_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(source_dir) else {
        return Vec::new();
    };
    let mut chapters: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt"))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().to_string()))
        .collect();
    chapters.sort();
    chapters
}
