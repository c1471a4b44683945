use chunkwise_core::{Sentence, SplitResult};

use super::SentenceSegmenter;

/// Punctuation-driven splitter.
///
/// A sentence ends after `.`, `!` or `?` when the following whitespace either
/// contains a newline or is followed by an uppercase letter. A blank line
/// ends a sentence regardless of punctuation. Whitespace after a boundary
/// stays with the sentence it follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> SplitResult<Vec<Sentence>> {
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut has_content = false;
        let mut prev: Option<char> = None;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !c.is_whitespace() {
                has_content = true;
                prev = Some(c);
                continue;
            }

            // Consume the whole whitespace run.
            let mut end = i + c.len_utf8();
            let mut newlines = usize::from(c == '\n');
            while let Some(&(j, d)) = chars.peek() {
                if !d.is_whitespace() {
                    break;
                }
                newlines += usize::from(d == '\n');
                end = j + d.len_utf8();
                chars.next();
            }

            let after_terminal = matches!(prev, Some('.' | '!' | '?'));
            let boundary = match chars.peek() {
                None => false,
                Some(&(_, next)) => {
                    has_content
                        && (newlines >= 2
                            || (after_terminal && (newlines == 1 || next.is_uppercase())))
                }
            };
            if boundary {
                sentences.push(Sentence::from_span(text, start, end));
                start = end;
                has_content = false;
            }
            prev = None;
        }

        if start < text.len() {
            sentences.push(Sentence::from_span(text, start, text.len()));
        }
        Ok(sentences)
    }

    fn name(&self) -> &str {
        "rules"
    }
}
