use unicode_segmentation::UnicodeSegmentation;

use chunkwise_core::{Sentence, SplitResult};

use super::SentenceSegmenter;

/// UAX #29 sentence boundaries.
///
/// Each span keeps its trailing whitespace, so the spans tile the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl SentenceSegmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> SplitResult<Vec<Sentence>> {
        Ok(text
            .split_sentence_bound_indices()
            .map(|(start, s)| Sentence {
                start_offset: start,
                end_offset: start + s.len(),
                text: s.to_string(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "unicode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::validate_spans;

    #[test]
    fn splits_simple_sentences() {
        let text = "The cat sat. The dog ran! Did the bird fly?";
        let sentences = UnicodeSegmenter.segment(text).unwrap();
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["The cat sat. ", "The dog ran! ", "Did the bird fly?"]);
        validate_spans(text, &sentences).unwrap();
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(UnicodeSegmenter.segment("").unwrap().is_empty());
    }

    #[test]
    fn multibyte_text_is_covered() {
        let text = "Café au lait. Ça va? Über alles.";
        let sentences = UnicodeSegmenter.segment(text).unwrap();
        assert_eq!(sentences.len(), 3);
        validate_spans(text, &sentences).unwrap();
    }
}
