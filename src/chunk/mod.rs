//! Chunk splitting
//!
//! Splits raw comment text into bold spans, line breaks and plain literal
//! chunks before any link pattern runs. Bold spans never cross a line break.

use crate::domain::TextRun;
use once_cell::sync::Lazy;
use regex::Regex;

static CHUNK_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<b>(?P<bold>[^\r\n]*?)</b>|(?P<newline>\r\n|\r|\n)")
        .expect("valid chunk delimiter regex")
});

/// Split `text` into chunks. Leading and trailing whitespace is trimmed first.
///
/// Bold spans come back as [`TextRun::Bold`] with the delimiters stripped,
/// every newline (`\n`, `\r\n` or a lone `\r`) as [`TextRun::LineBreak`], and
/// everything else as [`TextRun::Plain`]. Empty pieces are dropped, so empty
/// input yields no chunks.
pub fn split_chunks(text: &str) -> Vec<TextRun> {
    let text = text.trim();
    let mut chunks = Vec::new();
    let mut pos = 0usize;

    for caps in CHUNK_DELIMITER_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > pos {
            chunks.push(TextRun::plain(&text[pos..whole.start()]));
        }
        if let Some(bold) = caps.name("bold") {
            if !bold.as_str().is_empty() {
                chunks.push(TextRun::bold(bold.as_str()));
            }
        } else {
            chunks.push(TextRun::LineBreak);
        }
        pos = whole.end();
    }

    if pos < text.len() {
        chunks.push(TextRun::plain(&text[pos..]));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::runs_to_text;
    use similar_asserts::assert_eq;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_chunks("").is_empty());
        assert!(split_chunks("   \n\t ").is_empty());
    }

    #[test]
    fn bold_spans_are_tagged_and_stripped() {
        assert_eq!(
            split_chunks("test <b>autolinking go/testlink</b> is not nested"),
            vec![
                TextRun::plain("test "),
                TextRun::bold("autolinking go/testlink"),
                TextRun::plain(" is not nested"),
            ]
        );
    }

    #[test]
    fn multiline_bold_is_left_literal() {
        assert_eq!(
            split_chunks("<b>no multiline bold \rwith carriage \r\nreturns</b>"),
            vec![
                TextRun::plain("<b>no multiline bold "),
                TextRun::LineBreak,
                TextRun::plain("with carriage "),
                TextRun::LineBreak,
                TextRun::plain("returns</b>"),
            ]
        );
    }

    #[test]
    fn consecutive_newlines_each_break() {
        assert_eq!(
            split_chunks("a\n\n\nb"),
            vec![
                TextRun::plain("a"),
                TextRun::LineBreak,
                TextRun::LineBreak,
                TextRun::LineBreak,
                TextRun::plain("b"),
            ]
        );
    }

    #[test]
    fn adjacent_bold_spans_produce_no_empty_plain_chunk() {
        assert_eq!(
            split_chunks("<b>a</b><b>b</b>"),
            vec![TextRun::bold("a"), TextRun::bold("b")]
        );
    }

    #[test]
    fn rejoined_chunks_reproduce_trimmed_input() {
        let input = "  first line\nsecond <b>bold</b> part\nthird  ";
        let chunks = split_chunks(input);
        assert_eq!(runs_to_text(&chunks), "first line\nsecond bold part\nthird");
    }
}
