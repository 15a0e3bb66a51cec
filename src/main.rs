use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::blocking::Client;
use scraper::Html;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ukutabs_extract::{chordpro, fetch, progress, reconstruct};

#[derive(Parser)]
#[command(name = "ukutabs-extract")]
#[command(about = "Reconstruct ChordPro song sheets from UkuTabs chord pages")]
struct Args {
    /// Tab page URL to scrape (prints ChordPro to stdout)
    url: Option<String>,

    /// File with one tab page URL per line (batch mode)
    #[arg(long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Directory for batch output files (one .pro file per URL)
    #[arg(long, default_value = "tabs")]
    out_dir: PathBuf,

    /// Print the parsed block structure as JSON instead of ChordPro text
    #[arg(long)]
    json: bool,

    /// Hide progress bars for tail-friendly output
    #[arg(long)]
    log_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    progress::set_log_only(args.log_only);

    let client = fetch::build_client().context("failed to build HTTP client")?;

    match (&args.url, &args.input) {
        (Some(url), None) => scrape_one(&client, url, args.json),
        (None, Some(input)) => scrape_batch(&client, input, &args.out_dir),
        _ => bail!("provide a tab page URL, or --input <file> with one URL per line"),
    }
}

fn scrape_one(client: &Client, url: &str, json: bool) -> Result<()> {
    let spinner = progress::fetch_spinner(url);
    let html = fetch::fetch_page(client, url)?;
    spinner.finish_and_clear();

    let document = Html::parse_document(&html);
    let Some(content) = reconstruct::reconstruct(&document) else {
        // Not a transport failure: the page fetched fine but holds no tab.
        bail!("no chord blocks found at {url}");
    };

    if json {
        let parsed = chordpro::parse_song(&content)
            .context("reconstructed page contained no renderable lines")?;
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        println!("{content}");
    }
    Ok(())
}

fn scrape_batch(client: &Client, input: &Path, out_dir: &Path) -> Result<()> {
    let urls: Vec<String> = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        bail!("no URLs found in {}", input.display());
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let start = Instant::now();
    let pb = progress::batch_bar(urls.len() as u64);
    let mut written = 0usize;
    let mut no_content = 0usize;
    let mut failed = 0usize;

    for url in &urls {
        match fetch::fetch_page(client, url) {
            Ok(html) => match reconstruct::reconstruct_html(&html) {
                Some(content) if !content.is_empty() => {
                    let path = out_dir.join(format!("{}.pro", slug_for(url)));
                    fs::write(&path, format!("{content}\n"))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    written += 1;
                }
                other => {
                    no_content += 1;
                    eprintln!("[skip] {} at {}", skip_reason(&other), url);
                }
            },
            Err(err) => {
                failed += 1;
                eprintln!("[fail] {}", err);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    eprintln!(
        "scraped {}/{} pages in {} ({} without chord blocks, {} failed)",
        written,
        urls.len(),
        progress::format_duration(start.elapsed()),
        no_content,
        failed,
    );
    Ok(())
}

/// Why a fetched page produced no output file. The two outcomes stay
/// distinct: containers can match yet trim to an empty tab, which is not
/// the same as the selector matching nothing at all.
fn skip_reason(outcome: &Option<String>) -> &'static str {
    match outcome {
        Some(_) => "tab content is empty",
        None => "no chord blocks found",
    }
}

/// Output filename derived from the URL's last path segment.
fn slug_for(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let slug: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() {
        "tab".to_string()
    } else {
        slug
    }
}
