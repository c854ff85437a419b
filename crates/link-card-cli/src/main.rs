use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use link_card_config::Config;
use link_card_engine::{
    Classification, ConvertOptions, LinkMetadata, OfflineProvider, classify,
    convert::convert_selection, decode_document, encode, find_urls, io,
};
use serde_json::json;
use std::{io::Read, path::PathBuf, process};

#[derive(Debug, Parser)]
#[command(name = "link-card", version, about = "Turn URLs into cardlink blocks and back")]
struct Cli {
    /// Config file to use instead of ~/.config/link-card/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report whether TEXT is a bare URL, a linked URL or an image link
    Classify {
        text: String,
        /// List every URL found inside TEXT instead
        #[arg(long)]
        scan: bool,
    },
    /// Print a cardlink block for the given metadata
    Encode {
        #[arg(long)]
        url: String,
        /// Defaults to the URL
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// Decode every cardlink block in FILE (stdin when omitted) as JSON
    Decode { file: Option<PathBuf> },
    /// Convert a selection into a card without fetching anything
    Convert {
        text: String,
        #[arg(long, default_value_t = 0)]
        indent: usize,
        /// Convert direct image links too
        #[arg(long)]
        images: bool,
    },
    /// Report malformed cardlink blocks under DIR (config notes_path by default)
    Check {
        dir: Option<PathBuf>,
        /// Glob relative to DIR, e.g. "**/*.md"
        #[arg(long)]
        pattern: Option<String>,
    },
}

fn main() {
    // Info by default; RUST_LOG overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Classify { text, scan } => classify_text(&text, scan),
        Command::Encode {
            url,
            title,
            description,
            host,
            image,
            indent,
        } => {
            let title = title.unwrap_or_else(|| url.clone());
            let mut metadata = LinkMetadata::new(url, title)?.with_indent(indent);
            if let Some(description) = description {
                metadata = metadata.with_description(description);
            }
            if let Some(host) = host {
                metadata = metadata.with_host(host);
            }
            if let Some(image) = image {
                metadata = metadata.with_image(image);
            }
            print!("{}", encode(&metadata));
            Ok(0)
        }
        Command::Decode { file } => decode(file),
        Command::Convert {
            text,
            indent,
            images,
        } => {
            let options = ConvertOptions {
                indent,
                allow_images: images || config.as_ref().is_some_and(|c| c.convert_images),
                ..Default::default()
            };
            match convert_selection(&text, &OfflineProvider, &options)? {
                Some(block) => {
                    print!("{block}");
                    Ok(0)
                }
                None => {
                    log::info!("Not a convertible URL, leaving text unchanged");
                    println!("{text}");
                    Ok(1)
                }
            }
        }
        Command::Check { dir, pattern } => check(dir, pattern, config.as_ref()),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Option<Config>> {
    let config = match path {
        Some(path) => {
            let config = Config::load_from_path(path)?;
            if config.is_none() {
                bail!("Config file not found: {}", path.display());
            }
            config
        }
        None => Config::load()?,
    };
    if let Some(config) = &config {
        log::debug!("Using notes path {}", config.notes_path.display());
    }
    Ok(config)
}

fn classify_text(text: &str, scan: bool) -> Result<i32> {
    if scan {
        let found = find_urls(text);
        for m in &found {
            println!("{}..{}\t{}", m.span.start, m.span.end, m.url);
        }
        return Ok(if found.is_empty() { 1 } else { 0 });
    }

    let classification = classify(text);
    match &classification {
        Classification::Bare { url } => println!("bare\t{url}"),
        Classification::Linked(linked) => println!("linked\t{}\t{}", linked.url, linked.label),
        Classification::Image { url } => println!("image\t{url}"),
        Classification::NotUrl => println!("none"),
    }
    Ok(if classification.is_convertible() { 0 } else { 1 })
}

fn decode(file: Option<PathBuf>) -> Result<i32> {
    let (name, content) = match file {
        Some(path) => {
            let content = io::read_file(&path)?;
            (path.display().to_string(), content)
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            ("<stdin>".to_string(), content)
        }
    };

    let mut failed = 0;
    let mut output = Vec::new();
    for block in decode_document(&content) {
        match block.result {
            Ok(records) => output.push(json!({
                "lines": [block.lines.start + 1, block.lines.end],
                "cards": records,
            })),
            Err(e) => {
                failed += 1;
                eprintln!("{name}: {e}");
            }
        }
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(if failed == 0 { 0 } else { 1 })
}

fn check(dir: Option<PathBuf>, pattern: Option<String>, config: Option<&Config>) -> Result<i32> {
    let root = match (dir, config) {
        (Some(dir), _) => dir,
        (None, Some(config)) => config.notes_path.clone(),
        (None, None) => bail!(
            "No directory given and no config at {}",
            Config::config_path().display()
        ),
    };
    let pattern = pattern
        .or_else(|| config.map(|c| c.pattern.clone()))
        .unwrap_or_else(|| io::DEFAULT_PATTERN.to_string());

    let files = io::scan_markdown_files(&root, &pattern)?;
    log::info!("Checking {} files under {}", files.len(), root.display());

    let mut cards = 0;
    let mut failed = 0;
    for path in &files {
        for block in io::decode_file(path)? {
            match block.result {
                Ok(records) => cards += records.len(),
                Err(e) => {
                    failed += 1;
                    println!("{}:{}: {e}", path.display(), block.lines.start + 1);
                }
            }
        }
    }

    println!("{cards} cards ok, {failed} malformed blocks");
    Ok(if failed == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_encode_arguments() {
        let cli = Cli::parse_from([
            "link-card",
            "encode",
            "--url",
            "https://example.com",
            "--indent",
            "2",
        ]);
        assert!(matches!(
            cli.command,
            Command::Encode {
                indent: 2,
                title: None,
                ..
            }
        ));
    }

    #[test]
    fn check_uses_directory_argument() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("ok.md"),
            "```cardlink\nurl: https://example.com\ntitle: Example\n```\n",
        )
        .unwrap();

        let code = check(Some(dir.path().to_path_buf()), None, None).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn check_fails_on_malformed_block() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.md"), "```cardlink\ntitle: no url\n```\n").unwrap();
        let config = Config::new(dir.path().to_path_buf());

        let code = check(None, None, Some(&config)).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn check_without_directory_or_config_is_an_error() {
        assert!(check(None, None, None).is_err());
    }
}
