use std::collections::HashMap;

use reqwest::blocking::Client;
use serde::{
    de::DeserializeOwned,
    Deserialize,
};

use crate::core::ExportError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8765";

/// One field of a card as AnkiConnect reports it: the value plus its
/// position in the note type's layout.
#[derive(Debug, Deserialize, Clone)]
pub struct FieldValue {
    pub value: String,
    pub order: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    pub card_id: u64,
    pub model_name: String,
    pub fields: HashMap<String, FieldValue>,
    /// Positive values are days; learning cards report negative seconds.
    pub interval: i64,
    pub due: i64,
}

/// One entry of a card's review log. `id` doubles as the review timestamp
/// in epoch milliseconds.
#[derive(Debug, Deserialize, Clone)]
pub struct ReviewEntry {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

pub fn request_body(action: &str, params: Option<serde_json::Value>) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("action".to_string(), serde_json::Value::String(action.to_string()));
    body.insert("version".to_string(), serde_json::Value::Number((6).into()));

    if let Some(params) = params {
        body.insert("params".to_string(), params);
    }

    serde_json::Value::Object(body)
}

/// Blocking AnkiConnect client. All calls run to completion on the calling
/// thread; the workflow is strictly sequential.
pub struct AnkiClient {
    endpoint: String,
    http: Client,
}

impl AnkiClient {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: endpoint.to_string(), http: Client::new() }
    }

    fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T, ExportError> {
        let response: ApiResponse<T> = self
            .http
            .post(&self.endpoint)
            .json(&request_body(action, params))
            .send()?
            .json()?;

        if let Some(error) = response.error {
            return Err(ExportError::CollectionQuery(error));
        }
        response
            .result
            .ok_or_else(|| ExportError::CollectionQuery(format!("\"{action}\" returned no result")))
    }

    /// Connectivity probe; AnkiConnect answers with its protocol version.
    pub fn version(&self) -> Result<u32, ExportError> {
        self.invoke("version", None)
    }

    pub fn deck_names_and_ids(&self) -> Result<HashMap<String, u64>, ExportError> {
        self.invoke("deckNamesAndIds", None)
    }

    pub fn find_cards(&self, query: &str) -> Result<Vec<u64>, ExportError> {
        let params = serde_json::json!({ "query": query });
        self.invoke("findCards", Some(params))
    }

    /// Raw `cardsInfo` entries. Ids that cannot be resolved come back as
    /// empty objects, so the caller decides how strictly to decode.
    pub fn cards_info(&self, card_ids: &[u64]) -> Result<Vec<serde_json::Value>, ExportError> {
        let params = serde_json::json!({ "cards": card_ids });
        self.invoke("cardsInfo", Some(params))
    }

    pub fn model_field_names(&self, model_name: &str) -> Result<Vec<String>, ExportError> {
        let params = serde_json::json!({ "modelName": model_name });
        self.invoke("modelFieldNames", Some(params))
    }

    /// Full review logs per card, keyed by card id (as a string, the way
    /// AnkiConnect serializes map keys).
    pub fn reviews_of_cards(
        &self,
        card_ids: &[u64],
    ) -> Result<HashMap<String, Vec<ReviewEntry>>, ExportError> {
        let params = serde_json::json!({ "cards": card_ids });
        self.invoke("getReviewsOfCards", Some(params))
    }
}
