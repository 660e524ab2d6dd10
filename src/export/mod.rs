use log::debug;

use self::clipboard::ClipboardSink;
use crate::core::{
    extractor::extract_mature_cards,
    Collection,
    ExportError,
    ExportRequest,
    ExtractionResult,
};

pub mod clipboard;

/// What a successful run copied, for the closing user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    pub word_count: usize,
    pub words_only: bool,
}

impl PublishSummary {
    pub fn message(&self) -> String {
        let sync_type = if self.words_only { "words only" } else { "words and sentences" };
        format!(
            "Copied {} {} to the clipboard.\n\
             The words are ready to paste anywhere.\n\n\
             For Migaku users: open the Migaku settings, scroll to the\n\
             \"Known Words\" section, click \"Add Words\" and paste.",
            self.word_count, sync_type
        )
    }
}

/// Renders the extraction into the clipboard text: one card per line, word
/// and sentence joined by a tab when a sentence is present, no trailing
/// newline and no dangling tab.
pub fn format_clipboard_text(result: &ExtractionResult) -> String {
    let lines: Vec<String> = result
        .cards
        .iter()
        .map(|card| {
            if result.words_only || card.sentence.is_empty() {
                card.word.clone()
            } else {
                format!("{}\t{}", card.word, card.sentence)
            }
        })
        .collect();
    lines.join("\n")
}

/// Writes the formatted export to the sink as its sole content.
pub fn publish(
    result: &ExtractionResult,
    sink: &mut impl ClipboardSink,
) -> Result<PublishSummary, ExportError> {
    if result.cards.is_empty() {
        return Err(ExportError::EmptyExport);
    }

    let text = format_clipboard_text(result);
    debug!("publishing {} characters for {} cards", text.len(), result.cards.len());
    sink.set_text(&text)?;

    Ok(PublishSummary { word_count: result.cards.len(), words_only: result.words_only })
}

/// The extract-then-publish tail of the workflow. The sink is only touched
/// after extraction has fully succeeded; any extractor failure leaves the
/// clipboard as it was.
pub fn export_to_clipboard<C: Collection>(
    collection: &C,
    request: &ExportRequest,
    sink: &mut impl ClipboardSink,
) -> Result<PublishSummary, ExportError> {
    let result = extract_mature_cards(collection, request)?;
    publish(&result, sink)
}

#[cfg(test)]
mod tests {
    use std::collections::{
        HashMap,
        HashSet,
    };

    use pretty_assertions::assert_eq;

    use super::{
        clipboard::ClipboardSink,
        export_to_clipboard,
        format_clipboard_text,
        publish,
        PublishSummary,
    };
    use crate::core::{
        CardDetail,
        CardRecord,
        Collection,
        Deck,
        ExportError,
        ExportRequest,
        ExtractionResult,
    };

    struct MemorySink {
        contents: String,
        writes: usize,
    }

    impl MemorySink {
        fn seeded(sentinel: &str) -> Self {
            Self { contents: sentinel.to_string(), writes: 0 }
        }
    }

    impl ClipboardSink for MemorySink {
        fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
            self.contents = text.to_string();
            self.writes += 1;
            Ok(())
        }
    }

    fn record(word: &str, sentence: &str) -> CardRecord {
        CardRecord {
            word: word.to_string(),
            sentence: sentence.to_string(),
            order_key: 0,
            interval_days: 30.0,
            card_id: 1,
        }
    }

    fn result(words_only: bool, cards: Vec<CardRecord>) -> ExtractionResult {
        ExtractionResult {
            total_mature: cards.len(),
            total_valid: cards.len(),
            cards,
            words_only,
            word_field: "Word".to_string(),
            sentence_field: Some("Sentence".to_string()),
        }
    }

    #[test]
    fn words_only_mode_emits_one_word_per_line() {
        let result = result(true, vec![record("cat", "The cat sat."), record("dog", "")]);
        assert_eq!(format_clipboard_text(&result), "cat\ndog");
    }

    #[test]
    fn sentence_mode_tabs_word_and_sentence_without_dangling_delimiters() {
        let result = result(false, vec![record("cat", "The cat sat."), record("dog", "")]);
        assert_eq!(format_clipboard_text(&result), "cat\tThe cat sat.\ndog");
    }

    #[test]
    fn publish_replaces_the_sink_contents() {
        let mut sink = MemorySink::seeded("sentinel");
        let summary = publish(&result(true, vec![record("cat", "")]), &mut sink).unwrap();

        assert_eq!(sink.contents, "cat");
        assert_eq!(sink.writes, 1);
        assert_eq!(summary, PublishSummary { word_count: 1, words_only: true });
    }

    #[test]
    fn publishing_an_empty_result_leaves_the_sink_untouched() {
        let mut sink = MemorySink::seeded("sentinel");
        let error = publish(&result(false, Vec::new()), &mut sink).unwrap_err();

        assert!(matches!(error, ExportError::EmptyExport));
        assert_eq!(sink.contents, "sentinel");
        assert_eq!(sink.writes, 0);
    }

    /// A collection with a deck but not a single mature card in it.
    struct BarrenCollection;

    impl Collection for BarrenCollection {
        fn decks(&self) -> Result<Vec<Deck>, ExportError> {
            Ok(vec![Deck { name: "Default".to_string(), id: 1 }])
        }

        fn deck_card_ids(&self, _deck_name: &str) -> Result<HashSet<u64>, ExportError> {
            Ok(HashSet::new())
        }

        fn mature_card_ids(&self, _min_interval_days: u32) -> Result<HashSet<u64>, ExportError> {
            Ok(HashSet::new())
        }

        fn cards(&self, _card_ids: &[u64]) -> Result<Vec<CardDetail>, ExportError> {
            Ok(Vec::new())
        }

        fn field_names(&self, _deck_name: &str) -> Result<Vec<String>, ExportError> {
            Ok(Vec::new())
        }

        fn last_review_times(
            &self,
            _card_ids: &[u64],
        ) -> Result<HashMap<u64, i64>, ExportError> {
            Ok(HashMap::new())
        }
    }

    #[test]
    fn extraction_failure_never_touches_the_clipboard() {
        let mut sink = MemorySink::seeded("sentinel");
        let request = ExportRequest {
            deck_name: "Default".to_string(),
            words_only: true,
            word_field: "Word".to_string(),
            sentence_field: None,
        };

        let error = export_to_clipboard(&BarrenCollection, &request, &mut sink).unwrap_err();

        assert!(matches!(error, ExportError::NoMatureCards));
        assert_eq!(sink.contents, "sentinel");
        assert_eq!(sink.writes, 0);
    }

    #[test]
    fn summary_message_names_count_and_sync_type() {
        let summary = PublishSummary { word_count: 12, words_only: false };
        assert!(summary.message().starts_with("Copied 12 words and sentences"));
    }
}
