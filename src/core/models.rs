/// A deck as listed by the collection. The id is opaque to us; deck-scoped
/// queries go through the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub name: String,
    pub id: u64,
}

/// One card as the collection hands it to us, with the note-type field layout
/// already flattened into parallel name/value lists.
#[derive(Debug, Clone)]
pub struct CardDetail {
    pub card_id: u64,
    pub model_name: String,
    /// Field names in note-type order.
    pub field_names: Vec<String>,
    /// Field values, parallel to `field_names`.
    pub field_values: Vec<String>,
    pub interval_days: f32,
    pub due: i64,
}

/// What the user decided in the wizard; the extractor's sole input besides
/// the collection itself.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub deck_name: String,
    pub words_only: bool,
    pub word_field: String,
    pub sentence_field: Option<String>,
}

/// One exportable card. Built fresh on every run and dropped once the
/// clipboard text has been produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub word: String,
    pub sentence: String,
    pub order_key: i64,
    pub interval_days: f32,
    pub card_id: u64,
}

/// Output of a successful extraction. `cards` only contains records with a
/// non-empty word; `total_mature` counts everything that survived the
/// maturity intersection, valid or not.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub cards: Vec<CardRecord>,
    pub total_mature: usize,
    pub total_valid: usize,
    pub words_only: bool,
    pub word_field: String,
    pub sentence_field: Option<String>,
}
