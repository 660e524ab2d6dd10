use std::collections::{
    HashMap,
    HashSet,
};

use super::{
    errors::ExportError,
    models::{
        CardDetail,
        Deck,
    },
};

/// The read-only queries the workflow needs from a flashcard collection.
///
/// The live implementation talks to AnkiConnect; tests use an in-memory
/// fake. Every method returns a `Result` so that a collection going away
/// mid-run surfaces as `ExportError::CollectionQuery` instead of a panic.
pub trait Collection {
    /// All decks currently in the collection.
    fn decks(&self) -> Result<Vec<Deck>, ExportError>;

    /// Ids of every card in the named deck, including its sub-decks.
    fn deck_card_ids(&self, deck_name: &str) -> Result<HashSet<u64>, ExportError>;

    /// Ids of every card anywhere in the collection whose current scheduling
    /// interval is at least `min_interval_days`. Deliberately not
    /// deck-scoped; the caller intersects with `deck_card_ids` itself.
    fn mature_card_ids(&self, min_interval_days: u32) -> Result<HashSet<u64>, ExportError>;

    /// Detail records for the given cards. Ids that cannot be resolved are
    /// simply missing from the result, never an error.
    fn cards(&self, card_ids: &[u64]) -> Result<Vec<CardDetail>, ExportError>;

    /// Ordered field names of the note type used by the named deck.
    fn field_names(&self, deck_name: &str) -> Result<Vec<String>, ExportError>;

    /// Timestamp of the most recent review per card. Cards that were never
    /// reviewed are absent from the map.
    fn last_review_times(&self, card_ids: &[u64]) -> Result<HashMap<u64, i64>, ExportError>;
}
