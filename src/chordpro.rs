//! ChordPro text parsing and serialization.
//!
//! ChordPro places chord symbols inline in square brackets immediately
//! before the lyric syllable they apply to: `[Am]Mary had [C]a little lamb`.
//! `parse_song` turns such text into positional block sequences;
//! `song_to_chordpro` goes the other way.
//!
//! Parsing is deliberately lenient and never fails: only a complete
//! `[...]` token is classified as a chord, and any stray bracket usage is
//! kept verbatim as lyric text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ContentBlock, Line};

/// Matches one bracket-delimited chord token, e.g. `[Am7]`.
/// `[]` is not a chord; an empty pair stays in the surrounding lyric text.
static CHORD_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]+\]").unwrap());

/// Parse ChordPro text into per-line block sequences.
///
/// Returns `None` for empty input ("nothing to render"), which is distinct
/// from `Some(vec![])` for whitespace-only input (content present, zero
/// renderable lines). Blank lines never appear in the output.
pub fn parse_song(song: &str) -> Option<Vec<Line>> {
    if song.is_empty() {
        return None;
    }

    let lines = song
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect();

    Some(lines)
}

/// Split one line into chord and lyric blocks, preserving source order.
///
/// Chord tokens keep their bracket interior verbatim; the lyric segments
/// between them are trimmed, and segments that trim to nothing are dropped.
fn parse_line(line: &str) -> Line {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for token in CHORD_TOKEN.find_iter(line) {
        push_lyric(&mut blocks, &line[cursor..token.start()]);
        let name = &line[token.start() + 1..token.end() - 1];
        blocks.push(ContentBlock::chord(name));
        cursor = token.end();
    }
    push_lyric(&mut blocks, &line[cursor..]);

    blocks
}

fn push_lyric(blocks: &mut Vec<ContentBlock>, segment: &str) {
    let text = segment.trim();
    if !text.is_empty() {
        blocks.push(ContentBlock::lyric(text));
    }
}

/// Serialize one line back to bracketed ChordPro text.
///
/// A single separating space is inserted before a block unless the output
/// already ends in whitespace or a closing bracket, so chords abut the text
/// that follows them, per convention.
pub fn line_to_chordpro(line: &Line) -> String {
    let mut out = String::new();
    for block in line {
        match block {
            ContentBlock::Chord { name } => {
                if !out.is_empty()
                    && !out.ends_with(']')
                    && !out.ends_with(|c: char| c.is_whitespace())
                {
                    out.push(' ');
                }
                out.push('[');
                out.push_str(name);
                out.push(']');
            }
            ContentBlock::Lyric { text } => {
                if !out.is_empty()
                    && !out.ends_with(']')
                    && !out.ends_with(|c: char| c.is_whitespace())
                {
                    out.push(' ');
                }
                out.push_str(text);
            }
        }
    }
    out
}

/// Serialize a whole song, one line per row.
pub fn song_to_chordpro(lines: &[Line]) -> String {
    lines
        .iter()
        .map(line_to_chordpro)
        .collect::<Vec<_>>()
        .join("\n")
}
