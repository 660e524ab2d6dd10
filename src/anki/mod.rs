use std::collections::{
    HashMap,
    HashSet,
};

use log::debug;

use self::api::{
    AnkiClient,
    CardInfo,
};
use crate::core::{
    CardDetail,
    Collection,
    Deck,
    ExportError,
};

pub mod api;

/// Builds the deck-membership search query. Anki's `deck:` selector is
/// sub-deck-inclusive, which is exactly the membership the extractor wants.
pub fn deck_query(deck_name: &str) -> String {
    format!("deck:\"{}\"", deck_name.replace('"', "\\\""))
}

/// AnkiConnect reports intervals of learning cards as negative seconds and
/// everything else as days.
fn interval_to_days(interval: i64) -> f32 {
    if interval >= 0 {
        interval as f32
    } else {
        interval.unsigned_abs() as f32 / 86400.0
    }
}

impl From<CardInfo> for CardDetail {
    fn from(info: CardInfo) -> Self {
        let mut fields: Vec<(u32, String, String)> = info
            .fields
            .into_iter()
            .map(|(name, field)| (field.order, name, field.value))
            .collect();
        fields.sort_by_key(|(order, _, _)| *order);

        let (field_names, field_values) =
            fields.into_iter().map(|(_, name, value)| (name, value)).unzip();

        CardDetail {
            card_id: info.card_id,
            model_name: info.model_name,
            field_names,
            field_values,
            interval_days: interval_to_days(info.interval),
            due: info.due,
        }
    }
}

impl Collection for AnkiClient {
    fn decks(&self) -> Result<Vec<Deck>, ExportError> {
        let mut decks: Vec<Deck> = self
            .deck_names_and_ids()?
            .into_iter()
            .map(|(name, id)| Deck { name, id })
            .collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(decks)
    }

    fn deck_card_ids(&self, deck_name: &str) -> Result<HashSet<u64>, ExportError> {
        Ok(self.find_cards(&deck_query(deck_name))?.into_iter().collect())
    }

    fn mature_card_ids(&self, min_interval_days: u32) -> Result<HashSet<u64>, ExportError> {
        Ok(self
            .find_cards(&format!("prop:ivl>={min_interval_days}"))?
            .into_iter()
            .collect())
    }

    fn cards(&self, card_ids: &[u64]) -> Result<Vec<CardDetail>, ExportError> {
        // cardsInfo answers with an empty object for ids that cannot be
        // loaded anymore; those are dropped, not errors.
        Ok(self
            .cards_info(card_ids)?
            .into_iter()
            .filter_map(|value| serde_json::from_value::<CardInfo>(value).ok())
            .map(CardDetail::from)
            .collect())
    }

    fn field_names(&self, deck_name: &str) -> Result<Vec<String>, ExportError> {
        // The note type is taken from the deck's first card, same as the
        // selector needs it: no cards means no resolvable field list.
        let card_ids = self.deck_card_ids(deck_name)?;
        let Some(first) = card_ids.iter().min().copied() else {
            return Ok(Vec::new());
        };

        let info = self.cards(&[first])?;
        let Some(card) = info.first() else {
            return Ok(Vec::new());
        };
        debug!("resolving fields via note type \"{}\"", card.model_name);

        self.model_field_names(&card.model_name)
    }

    fn last_review_times(&self, card_ids: &[u64]) -> Result<HashMap<u64, i64>, ExportError> {
        let reviews = self.reviews_of_cards(card_ids)?;

        let mut times = HashMap::with_capacity(reviews.len());
        for (card_id, entries) in reviews {
            let Ok(card_id) = card_id.parse::<u64>() else {
                continue;
            };
            if let Some(latest) = entries.iter().map(|entry| entry.id).max() {
                times.insert(card_id, latest);
            }
        }
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        api::{
            request_body,
            ApiResponse,
            CardInfo,
        },
        deck_query,
        interval_to_days,
    };
    use crate::core::CardDetail;

    #[test]
    fn request_body_carries_the_version_6_envelope() {
        let body = request_body("findCards", Some(serde_json::json!({ "query": "deck:\"A\"" })));
        assert_eq!(
            body,
            serde_json::json!({
                "action": "findCards",
                "version": 6,
                "params": { "query": "deck:\"A\"" },
            })
        );

        let bare = request_body("version", None);
        assert_eq!(bare, serde_json::json!({ "action": "version", "version": 6 }));
    }

    #[test]
    fn deck_query_escapes_embedded_quotes() {
        assert_eq!(deck_query("Japanese::Core"), "deck:\"Japanese::Core\"");
        assert_eq!(deck_query("My \"best\" deck"), "deck:\"My \\\"best\\\" deck\"");
    }

    #[test]
    fn interval_conversion_handles_learning_cards() {
        assert_eq!(interval_to_days(21), 21.0);
        assert_eq!(interval_to_days(0), 0.0);
        // -43200 seconds is half a day.
        assert_eq!(interval_to_days(-43200), 0.5);
    }

    #[test]
    fn card_info_flattens_into_note_type_field_order() {
        let json = serde_json::json!({
            "cardId": 1498938915662_u64,
            "modelName": "Basic",
            "fields": {
                "Sentence": { "value": "The cat sat.", "order": 1 },
                "Word": { "value": "cat", "order": 0 },
            },
            "interval": 32,
            "due": 57,
            "reps": 4,
            "deckName": "Default",
        });
        let info: CardInfo = serde_json::from_value(json).unwrap();
        let detail = CardDetail::from(info);

        assert_eq!(detail.field_names, vec!["Word", "Sentence"]);
        assert_eq!(detail.field_values, vec!["cat", "The cat sat."]);
        assert_eq!(detail.interval_days, 32.0);
        assert_eq!(detail.due, 57);
    }

    #[test]
    fn api_response_separates_result_and_error() {
        let ok: ApiResponse<Vec<u64>> =
            serde_json::from_str(r#"{"result": [1, 2], "error": null}"#).unwrap();
        assert_eq!(ok.result, Some(vec![1, 2]));
        assert!(ok.error.is_none());

        let failed: ApiResponse<Vec<u64>> =
            serde_json::from_str(r#"{"result": null, "error": "deck was not found"}"#).unwrap();
        assert!(failed.result.is_none());
        assert_eq!(failed.error.as_deref(), Some("deck was not found"));
    }
}
