use thiserror::Error;

use crate::core::extractor::MATURE_INTERVAL_DAYS;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No decks found in your collection.")]
    NoDecksAvailable,

    #[error("The deck \"{0}\" has no cards. Please select a deck with cards.")]
    DeckHasNoCards(String),

    #[error("The deck \"{0}\" could not be found. Please try again.")]
    DeckNotFound(String),

    #[error("No fields found on the note type of deck \"{0}\".")]
    NoFieldsFound(String),

    #[error("The field \"{0}\" could not be found. Please try again.")]
    FieldNotFound(String),

    #[error(
        "No mature cards found in the selected deck. Mature cards are those with intervals of {days} days or more.",
        days = MATURE_INTERVAL_DAYS
    )]
    NoMatureCards,

    #[error(
        "No mature cards with valid word data found. Please ensure the selected word field contains data."
    )]
    NoValidWordData,

    #[error("Collection query failed: {0}")]
    CollectionQuery(String),

    #[error("No words to copy to the clipboard.")]
    EmptyExport,

    #[error("Failed to write to the clipboard: {0}")]
    ClipboardWrite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for ExportError {
    fn from(error: reqwest::Error) -> Self {
        ExportError::CollectionQuery(error.to_string())
    }
}
