use jiff::Timestamp;
use relink_core::LinkRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub url: Option<String>,
    /// Display label shown by scanner apps; cosmetic only.
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub id: String,
    pub redirect_url: String,
    pub qr_code_image: String,
    pub target_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub new_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub id: String,
    pub new_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub id: String,
    pub target_url: String,
    pub clicks: u64,
    pub created_at: Timestamp,
}

impl From<LinkRecord> for InfoResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            id: record.code.to_string(),
            target_url: record.target_url,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
