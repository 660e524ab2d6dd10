use std::collections::HashMap;

use log::debug;

use super::{
    collection::Collection,
    errors::ExportError,
    models::{
        CardRecord,
        ExportRequest,
        ExtractionResult,
    },
};

/// Cards with a scheduling interval of at least this many days count as
/// mature.
pub const MATURE_INTERVAL_DAYS: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Output order for the exported cards. Ascending puts the
/// oldest-reviewed cards first, which is what consumers that append or
/// auto-scroll incrementally expect.
pub const REVIEW_SORT_DIRECTION: SortDirection = SortDirection::Ascending;

/// Word/sentence positions within one note type's field layout.
struct FieldSlots {
    word: Option<usize>,
    sentence: Option<usize>,
}

fn resolve_field_slots(field_names: &[String], request: &ExportRequest) -> FieldSlots {
    let mut slots = FieldSlots { word: None, sentence: None };
    for (index, name) in field_names.iter().enumerate() {
        if *name == request.word_field {
            slots.word = Some(index);
        }
        if !request.words_only {
            if let Some(sentence_field) = &request.sentence_field {
                if !sentence_field.is_empty() && name == sentence_field {
                    slots.sentence = Some(index);
                }
            }
        }
    }
    slots
}

/// Picks the ranking value for output ordering: the first present, non-zero
/// signal wins, falling back to zero when none is usable.
pub fn order_key(signals: &[Option<i64>]) -> i64 {
    signals.iter().flatten().copied().find(|value| *value != 0).unwrap_or(0)
}

/// Filters the selected deck down to its mature cards and resolves the
/// word/sentence values for each of them.
///
/// The maturity filter and the deck filter are fetched as two separate
/// queries and intersected in-process; combining them into a single search
/// query returns incorrect results on some Anki installations.
pub fn extract_mature_cards<C: Collection>(
    collection: &C,
    request: &ExportRequest,
) -> Result<ExtractionResult, ExportError> {
    let mature_ids = collection.mature_card_ids(MATURE_INTERVAL_DAYS)?;
    if mature_ids.is_empty() {
        return Err(ExportError::NoMatureCards);
    }

    let deck_ids = collection.deck_card_ids(&request.deck_name)?;

    let mature_in_deck: Vec<u64> = mature_ids.intersection(&deck_ids).copied().collect();
    if mature_in_deck.is_empty() {
        return Err(ExportError::NoMatureCards);
    }
    debug!(
        "{} mature of {} cards in deck \"{}\"",
        mature_in_deck.len(),
        deck_ids.len(),
        request.deck_name
    );

    let details = collection.cards(&mature_in_deck)?;
    let review_times = collection.last_review_times(&mature_in_deck)?;

    // All cards of one note type share a field layout, so the name-to-index
    // scan runs once per note type seen during the run.
    let mut slots_by_model: HashMap<String, FieldSlots> = HashMap::new();
    let mut records: Vec<CardRecord> = Vec::with_capacity(details.len());

    for card in &details {
        let slots = slots_by_model
            .entry(card.model_name.clone())
            .or_insert_with(|| resolve_field_slots(&card.field_names, request));

        let word = slots
            .word
            .and_then(|index| card.field_values.get(index))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let sentence = slots
            .sentence
            .and_then(|index| card.field_values.get(index))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();

        let last_review = review_times.get(&card.card_id).copied();
        records.push(CardRecord {
            word,
            sentence,
            order_key: order_key(&[last_review, Some(card.due)]),
            interval_days: card.interval_days,
            card_id: card.card_id,
        });
    }

    let total_mature = records.len();

    match REVIEW_SORT_DIRECTION {
        SortDirection::Ascending => records.sort_by_key(|record| record.order_key),
        SortDirection::Descending => {
            records.sort_by_key(|record| std::cmp::Reverse(record.order_key))
        }
    }

    let valid_cards: Vec<CardRecord> =
        records.into_iter().filter(|record| !record.word.is_empty()).collect();
    if valid_cards.is_empty() {
        return Err(ExportError::NoValidWordData);
    }

    Ok(ExtractionResult {
        total_mature,
        total_valid: valid_cards.len(),
        cards: valid_cards,
        words_only: request.words_only,
        word_field: request.word_field.clone(),
        sentence_field: request.sentence_field.clone(),
    })
}
