use serde::{Deserialize, Serialize};

/// Query string accepted by `GET /api/pages`.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    #[serde(rename = "bookId")]
    pub book_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        HealthResponse {
            status: "ok".to_owned(),
        }
    }
}
