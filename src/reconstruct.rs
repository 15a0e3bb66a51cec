//! Reconstruct ChordPro text from a UkuTabs chord page.
//!
//! UkuTabs encodes a song inside `<pre>` containers whose children mix plain
//! text, `<br>` line breaks, and `<span class="cchrd">` chord annotations
//! (the chord symbol itself lives in a nested `.cch` element). The markup is
//! loosely schematized: whitespace is inconsistent, decorative anchors and
//! spans appear between the nodes that matter, and blank spacer rows are
//! expressed as consecutive `<br>` tags.
//!
//! Reconstruction walks the immediate children of each matched container in
//! document order, classifying every node once (`NodeKind`) and folding the
//! classified sequence through a line buffer. It never performs I/O and
//! never fails: unknown markup is skipped, sparse trees produce best-effort
//! output, and a page with no chord containers at all yields `None` rather
//! than an error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// The tab site's known chord-display containers.
static CHORD_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"pre.qoate-code, pre[class*="chords"]"#).unwrap()
});

/// Nested element holding the chord symbol inside a chord annotation.
static CHORD_SYMBOL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".cch").unwrap());

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\r?\n){3,}").unwrap());

/// Marker class on chord annotation elements.
const CHORD_MARKER_CLASS: &str = "cchrd";

// ============================================================================
// Node Classification
// ============================================================================

/// What one child node of a chord container contributes to the output.
#[derive(Debug, PartialEq)]
enum NodeKind {
    /// A chord annotation; the symbol is already extracted and trimmed.
    Chord(String),
    /// An explicit `<br>` line break.
    LineBreak,
    /// A plain text node, whitespace still raw.
    Text(String),
    /// Decoration (anchors, styling spans, comments). Not traversed into;
    /// descending would duplicate text the chord annotations already carry.
    Ignored,
}

fn classify_element(element: ElementRef<'_>) -> NodeKind {
    match element.value().name() {
        "br" => NodeKind::LineBreak,
        "span" if element.value().classes().any(|c| c == CHORD_MARKER_CLASS) => {
            // Text of every `.cch` descendant, concatenated in document order.
            let symbol: String = element
                .select(&CHORD_SYMBOL_SELECTOR)
                .flat_map(|el| el.text())
                .collect();
            NodeKind::Chord(symbol.trim().to_string())
        }
        _ => NodeKind::Ignored,
    }
}

// ============================================================================
// Line Accumulation
// ============================================================================

/// Accumulator for the line currently being reconstructed.
///
/// Local to a single container walk, so separate invocations share no state.
#[derive(Default)]
struct LineBuffer {
    current: String,
}

impl LineBuffer {
    /// A separating space is needed before new content unless the line is
    /// empty or already ends in whitespace or a closing bracket.
    fn needs_separator(&self) -> bool {
        !self.current.is_empty()
            && !self.current.ends_with(|c: char| c.is_whitespace())
            && !self.current.ends_with(']')
    }

    fn push_chord(&mut self, symbol: &str) {
        if symbol.is_empty() {
            return;
        }
        if self.needs_separator() {
            self.current.push(' ');
        }
        self.current.push('[');
        self.current.push_str(symbol);
        self.current.push(']');
    }

    fn push_text(&mut self, raw: &str) {
        // Newlines inside a text node are layout noise, not line breaks;
        // only <br> breaks a line. Collapse them and any space runs.
        let collapsed = LINE_BREAKS.replace_all(raw, " ");
        let text = MULTI_SPACE.replace_all(&collapsed, " ");

        if text.trim().is_empty() {
            // A whitespace-only node contributes at most one padding space.
            if !text.is_empty() && self.needs_separator() {
                self.current.push(' ');
            }
            return;
        }

        if self.needs_separator() && !text.starts_with(|c: char| c.is_whitespace()) {
            self.current.push(' ');
        }
        if self.current.is_empty() {
            self.current.push_str(text.trim_start());
        } else {
            self.current.push_str(&text);
        }
    }

    /// Finalize the line at an explicit break. A blank line still emits a
    /// bare newline so intentional spacer rows survive reconstruction.
    fn flush_line(&mut self, out: &mut String) {
        let trimmed = self.current.trim();
        if !trimmed.is_empty() {
            out.push_str(trimmed);
        }
        out.push('\n');
        self.current.clear();
    }

    /// Flush whatever remains after the last child; nothing is emitted for
    /// a blank remainder.
    fn flush_remainder(&mut self, out: &mut String) {
        let trimmed = self.current.trim();
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            out.push('\n');
        }
        self.current.clear();
    }
}

// ============================================================================
// Reconstruction
// ============================================================================

/// Reconstruct ChordPro text from a parsed tab page.
///
/// Returns `None` when no chord containers match - a distinct,
/// non-exceptional outcome callers must not confuse with a fetch or parse
/// failure. With at least one container the result is always `Some`, even
/// if every line turned out blank.
pub fn reconstruct(document: &Html) -> Option<String> {
    let mut matched_any = false;
    let mut output = String::new();

    for container in document.select(&CHORD_BLOCK_SELECTOR) {
        matched_any = true;
        let mut line = LineBuffer::default();

        for child in container.children() {
            let kind = if let Some(text) = child.value().as_text() {
                NodeKind::Text(text.to_string())
            } else if let Some(element) = ElementRef::wrap(child) {
                classify_element(element)
            } else {
                NodeKind::Ignored
            };

            match kind {
                NodeKind::Chord(symbol) => line.push_chord(&symbol),
                NodeKind::LineBreak => line.flush_line(&mut output),
                NodeKind::Text(raw) => line.push_text(&raw),
                NodeKind::Ignored => {}
            }
        }

        line.flush_remainder(&mut output);
        // Blank-line separator between containers.
        output.push('\n');
    }

    if !matched_any {
        return None;
    }

    // Cap consecutive blank lines at one across the whole document.
    let cleaned = EXCESS_BLANK_LINES.replace_all(output.trim(), "\n\n");
    Some(cleaned.into_owned())
}

/// Parse raw HTML and reconstruct in one step.
pub fn reconstruct_html(html: &str) -> Option<String> {
    reconstruct(&Html::parse_document(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(inner: &str) -> String {
        format!(r#"<html><body><pre class="qoate-code">{inner}</pre></body></html>"#)
    }

    fn chord(symbol: &str) -> String {
        format!(r#"<span class="cchrd"><span class="cch">{symbol}</span></span>"#)
    }

    #[test]
    fn test_no_chord_blocks_is_absent() {
        assert_eq!(reconstruct_html("<html><body><p>hi</p></body></html>"), None);
        assert_eq!(reconstruct_html("<pre>plain pre without the class</pre>"), None);
    }

    #[test]
    fn test_text_and_chord_on_one_line() {
        let html = page(&format!("I feel {}good", chord("G")));
        assert_eq!(reconstruct_html(&html).unwrap(), "I feel [G]good");
    }

    #[test]
    fn test_separator_before_chord_mid_word() {
        let html = page(&format!("Hello{}", chord("G")));
        assert_eq!(reconstruct_html(&html).unwrap(), "Hello [G]");
    }

    #[test]
    fn test_no_separator_between_adjacent_chords() {
        let html = page(&format!("{}{}", chord("G"), chord("C")));
        assert_eq!(reconstruct_html(&html).unwrap(), "[G][C]");
    }

    #[test]
    fn test_line_breaks_split_lines() {
        let html = page(&format!("{}one<br>{}two", chord("Am"), chord("F")));
        assert_eq!(reconstruct_html(&html).unwrap(), "[Am]one\n[F]two");
    }

    #[test]
    fn test_blank_row_between_sections_preserved() {
        let html = page("verse line<br><br>chorus line");
        assert_eq!(
            reconstruct_html(&html).unwrap(),
            "verse line\n\nchorus line"
        );
    }

    #[test]
    fn test_consecutive_blank_rows_capped() {
        let html = page("verse<br><br><br><br><br>chorus");
        assert_eq!(reconstruct_html(&html).unwrap(), "verse\n\nchorus");
    }

    #[test]
    fn test_single_break_container_trims_to_empty() {
        // One spacer row and nothing else: the final trim removes it, but
        // the outcome is still "content matched", not "no containers".
        let html = page("<br>");
        assert_eq!(reconstruct_html(&html).unwrap(), "");
    }

    #[test]
    fn test_decorative_tags_ignored() {
        let html = page(&format!(
            r#"<a href="/artist">ignored link</a>{}good <span class="deco">skip me</span>times"#,
            chord("G")
        ));
        assert_eq!(reconstruct_html(&html).unwrap(), "[G]good times");
    }

    #[test]
    fn test_nested_markup_inside_chord_extracted_once() {
        let html = page(
            r#"<span class="cchrd"><a href="/chords/am7"><span class="cch">Am7</span></a></span>rest"#,
        );
        assert_eq!(reconstruct_html(&html).unwrap(), "[Am7]rest");
    }

    #[test]
    fn test_chord_symbol_split_across_elements_concatenated() {
        let html = page(
            r#"<span class="cchrd"><span class="cch">A</span><span class="cch">m7</span></span>x"#,
        );
        assert_eq!(reconstruct_html(&html).unwrap(), "[Am7]x");
    }

    #[test]
    fn test_chord_annotation_without_symbol_skipped() {
        let html = page(r#"<span class="cchrd"><span class="cch">  </span></span>lyric"#);
        assert_eq!(reconstruct_html(&html).unwrap(), "lyric");
    }

    #[test]
    fn test_text_node_whitespace_collapsed() {
        let html = page("too   many\n\n   spaces");
        assert_eq!(reconstruct_html(&html).unwrap(), "too many spaces");
    }

    #[test]
    fn test_whitespace_only_node_pads_after_text() {
        // The <i> elements are ignored but keep the text nodes separate;
        // the whitespace-only middle node contributes exactly one space.
        let html = page("word<i>x</i> <i>y</i>more");
        assert_eq!(reconstruct_html(&html).unwrap(), "word more");
    }

    #[test]
    fn test_no_padding_after_closing_bracket() {
        let html = page(&format!("word {} {}end", chord("C"), chord("G")));
        assert_eq!(reconstruct_html(&html).unwrap(), "word [C][G]end");
    }

    #[test]
    fn test_multiple_containers_separated_by_blank_line() {
        let html =
            r#"<pre class="qoate-code">first block</pre><pre class="chords-b">second block</pre>"#;
        assert_eq!(
            reconstruct_html(html).unwrap(),
            "first block\n\nsecond block"
        );
    }

    #[test]
    fn test_class_substring_selector_matches() {
        let html = r#"<pre class="ukutabs-chords-view">line</pre>"#;
        assert_eq!(reconstruct_html(html).unwrap(), "line");
    }

    #[test]
    fn test_realistic_fragment() {
        let inner = format!(
            "{}Wise men say<br>only fools {}rush in<br><br>\n  {}take my hand",
            chord("C"),
            chord("Am"),
            chord("F"),
        );
        let html = page(&inner);
        assert_eq!(
            reconstruct_html(&html).unwrap(),
            "[C]Wise men say\nonly fools [Am]rush in\n\n[F]take my hand"
        );
    }
}
