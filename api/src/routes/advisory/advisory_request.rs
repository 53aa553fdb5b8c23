use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request payload for `POST /get-advisory`.
#[derive(Debug, Deserialize)]
pub struct AdvisoryRequest {
    /// Free-form farmer profile; key order is kept when it is turned into text.
    pub farmer_data: Map<String, Value>,
    /// Natural-language question.
    pub question: String,
}

/// Response payload for `POST /get-advisory`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    /// Raw model answer.
    pub advisory: String,
}
