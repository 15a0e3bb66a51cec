//! Display pairing for parsed songs.
//!
//! Converts block sequences into rows of cells where each chord sits above
//! the lyric fragment it annotates. Pairing is strictly positional: a chord
//! takes the block immediately following it when that block is a lyric, and
//! a single-space placeholder otherwise. Two consecutive chords therefore
//! leave the first one over a placeholder; no merge rule is applied.

use serde::Serialize;

use crate::models::{ContentBlock, Line};

/// Placeholder shown above/below when a chord has no lyric to pair with.
const BLANK_LYRIC: &str = " ";

/// One display column: an optional chord symbol over a lyric fragment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayCell {
    pub chord: Option<String>,
    pub lyric: String,
}

/// Build display rows for a whole song, one row per parsed line.
pub fn display_rows(lines: &[Line]) -> Vec<Vec<DisplayCell>> {
    lines.iter().map(display_row).collect()
}

fn display_row(line: &Line) -> Vec<DisplayCell> {
    let mut cells = Vec::new();

    for (idx, block) in line.iter().enumerate() {
        match block {
            ContentBlock::Lyric { text } if idx == 0 => {
                cells.push(DisplayCell {
                    chord: None,
                    lyric: text.clone(),
                });
            }
            ContentBlock::Chord { name } => {
                let lyric = match line.get(idx + 1) {
                    Some(ContentBlock::Lyric { text }) => text.clone(),
                    _ => BLANK_LYRIC.to_string(),
                };
                cells.push(DisplayCell {
                    chord: Some(name.clone()),
                    lyric,
                });
            }
            // Already consumed by the chord cell before it.
            ContentBlock::Lyric { .. } => {}
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chordpro::parse_song;

    fn cell(chord: Option<&str>, lyric: &str) -> DisplayCell {
        DisplayCell {
            chord: chord.map(str::to_string),
            lyric: lyric.to_string(),
        }
    }

    #[test]
    fn test_chord_pairs_with_following_lyric() {
        let song = parse_song("[Am]Mary had [C]a little lamb").unwrap();
        let rows = display_rows(&song);
        assert_eq!(
            rows,
            vec![vec![
                cell(Some("Am"), "Mary had"),
                cell(Some("C"), "a little lamb"),
            ]]
        );
    }

    #[test]
    fn test_leading_lyric_has_no_chord() {
        let song = parse_song("intro words [G]then chords").unwrap();
        let rows = display_rows(&song);
        assert_eq!(
            rows,
            vec![vec![
                cell(None, "intro words"),
                cell(Some("G"), "then chords"),
            ]]
        );
    }

    #[test]
    fn test_consecutive_chords_use_placeholder() {
        // Known display ambiguity: the first chord keeps only a blank
        // placeholder, it is not merged with the next one.
        let song = parse_song("[Am][C]lyric").unwrap();
        let rows = display_rows(&song);
        assert_eq!(
            rows,
            vec![vec![cell(Some("Am"), " "), cell(Some("C"), "lyric")]]
        );
    }

    #[test]
    fn test_trailing_chord_uses_placeholder() {
        let song = parse_song("fade out [G]").unwrap();
        let rows = display_rows(&song);
        assert_eq!(
            rows,
            vec![vec![cell(None, "fade out"), cell(Some("G"), " ")]]
        );
    }

    #[test]
    fn test_one_row_per_parsed_line() {
        let song = parse_song("[C]one\n\ntwo\n[G]three").unwrap();
        assert_eq!(display_rows(&song).len(), 3);
    }
}
