//! Core data model for parsed songs.
//!
//! A song is an ordered sequence of lines, and each line is an ordered
//! sequence of content blocks: chord symbols and the lyric fragments they
//! sit above. Block order always matches the left-to-right order of the
//! source text.

use serde::{Deserialize, Serialize};

// ============================================================================
// Content Blocks
// ============================================================================

/// One parsed unit of a song line: either a chord symbol (brackets already
/// stripped) or a fragment of lyric text.
///
/// A `Lyric`'s text is never empty; empty fragments are filtered out during
/// parsing. A `Chord` is conventionally followed by the lyric it annotates,
/// but that pairing is a rendering convention (see `render`), not an
/// invariant of the block sequence itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Chord { name: String },
    Lyric { text: String },
}

impl ContentBlock {
    pub fn chord(name: impl Into<String>) -> Self {
        ContentBlock::Chord { name: name.into() }
    }

    pub fn lyric(text: impl Into<String>) -> Self {
        ContentBlock::Lyric { text: text.into() }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, ContentBlock::Chord { .. })
    }

    /// The block's textual content: the chord symbol or the lyric fragment.
    pub fn content(&self) -> &str {
        match self {
            ContentBlock::Chord { name } => name,
            ContentBlock::Lyric { text } => text,
        }
    }
}

/// One printable row of a song: chords and the lyric text they align above.
pub type Line = Vec<ContentBlock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_json_shape() {
        let chord = serde_json::to_value(ContentBlock::chord("Am7")).unwrap();
        assert_eq!(chord["type"], "chord");
        assert_eq!(chord["name"], "Am7");

        let lyric = serde_json::to_value(ContentBlock::lyric("hello")).unwrap();
        assert_eq!(lyric["type"], "lyric");
        assert_eq!(lyric["text"], "hello");
    }

    #[test]
    fn test_content_accessor() {
        assert_eq!(ContentBlock::chord("C").content(), "C");
        assert_eq!(ContentBlock::lyric("la la").content(), "la la");
        assert!(ContentBlock::chord("C").is_chord());
        assert!(!ContentBlock::lyric("la").is_chord());
    }
}
