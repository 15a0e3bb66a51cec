//! Inspect a ChordPro file: dump the parsed block structure as JSON, or
//! render aligned chord-over-lyric rows the way an editor would display them.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use ukutabs_extract::chordpro;
use ukutabs_extract::render::{display_rows, DisplayCell};

#[derive(Parser)]
#[command(name = "chordpro-check")]
#[command(about = "Parse a ChordPro file and inspect its block structure")]
struct Args {
    /// ChordPro file to parse
    file: PathBuf,

    /// Render aligned chord/lyric rows instead of JSON
    #[arg(long)]
    rows: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let Some(song) = chordpro::parse_song(&text) else {
        bail!("{} is empty", args.file.display());
    };

    if args.rows {
        for row in display_rows(&song) {
            print_row(&row);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&song)?);
    }
    Ok(())
}

/// Print one chord line above one lyric line, each column padded so the
/// chord starts where its lyric fragment starts.
fn print_row(row: &[DisplayCell]) {
    let mut chord_line = String::new();
    let mut lyric_line = String::new();

    for cell in row {
        let chord = cell.chord.as_deref().unwrap_or("");
        let width = cell.lyric.chars().count().max(chord.chars().count() + 1);
        chord_line.push_str(&format!("{:<width$}", chord));
        lyric_line.push_str(&format!("{:<width$}", cell.lyric));
    }

    println!("{}", chord_line.trim_end());
    println!("{}", lyric_line.trim_end());
}
