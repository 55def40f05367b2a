use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Chart,
    Insight,
    Audience,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssetType::Chart => "chart",
            AssetType::Insight => "insight",
            AssetType::Audience => "audience",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub description: String,
    /// Asset payload, opaque to the service.
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFavoriteRequest {
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub description: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFavoriteRequest {
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub description: String,
    pub data: serde_json::Value,
}

/// Fields that can be partially updated via PATCH.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchFavoriteRequest {
    #[serde(rename = "type")]
    pub kind: Option<AssetType>,
    pub description: Option<String>,
    pub data: Option<serde_json::Value>,
}
