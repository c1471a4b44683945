//! Sentence segmentation seam.
//!
//! The engine only relies on the output contract: spans are ordered,
//! non-overlapping and cover the whole input. [`validate_spans`] enforces it
//! for any implementation.

mod rules;
mod unicode;

use std::sync::Arc;

use chunkwise_core::{Sentence, SplitError, SplitResult};

pub use rules::RuleSegmenter;
pub use unicode::UnicodeSegmenter;

/// Turns raw text into an ordered, covering sequence of sentence spans.
pub trait SentenceSegmenter: Send + Sync {
    /// Segment `text`. Empty input yields an empty sequence.
    fn segment(&self, text: &str) -> SplitResult<Vec<Sentence>>;

    /// Short identifier for logs and health output.
    fn name(&self) -> &str;
}

/// Look up a built-in segmenter by its config name.
pub fn from_name(name: &str) -> SplitResult<Arc<dyn SentenceSegmenter>> {
    match name {
        "unicode" => Ok(Arc::new(UnicodeSegmenter)),
        "rules" => Ok(Arc::new(RuleSegmenter)),
        other => Err(SplitError::ModelUnavailable(format!(
            "unknown segmenter '{other}' (expected 'unicode' or 'rules')"
        ))),
    }
}

/// Fold whitespace-only spans into a neighbour.
///
/// A blank span joins the sentence before it, or the one after it when it
/// leads the document. Coverage is preserved. Input that is nothing but
/// whitespace stays a single span.
pub fn merge_blank_spans(sentences: Vec<Sentence>) -> Vec<Sentence> {
    let mut out: Vec<Sentence> = Vec::with_capacity(sentences.len());
    let mut leading: Option<Sentence> = None;
    for sentence in sentences {
        if sentence.is_blank() {
            if let Some(prev) = out.last_mut() {
                absorb(prev, &sentence);
            } else if let Some(lead) = leading.as_mut() {
                absorb(lead, &sentence);
            } else {
                leading = Some(sentence);
            }
            continue;
        }
        match leading.take() {
            Some(mut lead) => {
                absorb(&mut lead, &sentence);
                out.push(lead);
            }
            None => out.push(sentence),
        }
    }
    out.extend(leading);
    out
}

fn absorb(into: &mut Sentence, next: &Sentence) {
    into.end_offset = next.end_offset;
    into.text.push_str(&next.text);
}

/// Check that `sentences` tile `text` exactly, in order.
pub fn validate_spans(text: &str, sentences: &[Sentence]) -> SplitResult<()> {
    let mut cursor = 0usize;
    for (i, s) in sentences.iter().enumerate() {
        if s.start_offset != cursor {
            return Err(SplitError::SegmentationFailure(format!(
                "sentence {i} starts at {} but previous span ended at {cursor}",
                s.start_offset
            )));
        }
        if s.end_offset <= s.start_offset {
            return Err(SplitError::SegmentationFailure(format!(
                "sentence {i} is empty or reversed ({}..{})",
                s.start_offset, s.end_offset
            )));
        }
        match text.get(s.start_offset..s.end_offset) {
            Some(slice) if slice == s.text => {}
            Some(_) => {
                return Err(SplitError::SegmentationFailure(format!(
                    "sentence {i} text does not match its span"
                )))
            }
            None => {
                return Err(SplitError::SegmentationFailure(format!(
                    "sentence {i} span {}..{} is out of bounds or splits a character",
                    s.start_offset, s.end_offset
                )))
            }
        }
        cursor = s.end_offset;
    }
    if cursor != text.len() {
        return Err(SplitError::SegmentationFailure(format!(
            "segmentation stops at {cursor} of {} bytes",
            text.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str, bounds: &[(usize, usize)]) -> Vec<Sentence> {
        bounds
            .iter()
            .map(|&(s, e)| Sentence::from_span(text, s, e))
            .collect()
    }

    #[test]
    fn accepts_covering_spans() {
        let text = "One. Two.";
        assert!(validate_spans(text, &spans(text, &[(0, 5), (5, 9)])).is_ok());
        assert!(validate_spans("", &[]).is_ok());
    }

    #[test]
    fn rejects_gap() {
        let text = "One. Two.";
        let err = validate_spans(text, &spans(text, &[(0, 4), (5, 9)])).unwrap_err();
        assert_eq!(err.kind(), "segmentation_failure");
    }

    #[test]
    fn rejects_short_coverage() {
        let text = "One. Two.";
        assert!(validate_spans(text, &spans(text, &[(0, 5)])).is_err());
    }

    #[test]
    fn rejects_mismatched_text() {
        let text = "One. Two.";
        let mut sentences = spans(text, &[(0, 5), (5, 9)]);
        sentences[1].text = "Tw0.".to_string();
        assert!(validate_spans(text, &sentences).is_err());
    }

    #[test]
    fn rejects_split_character() {
        let text = "é";
        let bogus = vec![Sentence {
            start_offset: 0,
            end_offset: 1,
            text: String::new(),
        }];
        assert!(validate_spans(text, &bogus).is_err());
    }

    #[test]
    fn blank_spans_join_previous_sentence() {
        let text = "One.\n\n \nTwo.";
        let merged = merge_blank_spans(spans(text, &[(0, 5), (5, 6), (6, 8), (8, 9), (9, 13)]));
        let texts: Vec<&str> = merged.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["One.\n\n \n", "Two."]);
        validate_spans(text, &merged).unwrap();
    }

    #[test]
    fn leading_blank_spans_join_first_sentence() {
        let text = "\n\nOne. Two.";
        let merged = merge_blank_spans(spans(text, &[(0, 1), (1, 2), (2, 7), (7, 11)]));
        let texts: Vec<&str> = merged.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["\n\nOne. ", "Two."]);
        validate_spans(text, &merged).unwrap();
    }

    #[test]
    fn all_blank_input_stays_one_span() {
        let text = " \n\n ";
        let merged = merge_blank_spans(spans(text, &[(0, 2), (2, 3), (3, 4)]));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, text);
        assert!(merge_blank_spans(Vec::new()).is_empty());
    }

    #[test]
    fn from_name_knows_builtins() {
        assert_eq!(from_name("unicode").unwrap().name(), "unicode");
        assert_eq!(from_name("rules").unwrap().name(), "rules");
        assert!(matches!(from_name("spacy"), Err(SplitError::ModelUnavailable(_))));
    }
}
