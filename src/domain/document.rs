use serde::Deserialize;

use super::Tone;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    pub id: u64,
    pub workgroup_id: u64,
    #[serde(default)]
    pub deliverable_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub public_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub workgroup_name: String,
    #[serde(default)]
    pub deliverable_name: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub can_delete: bool,
}

impl Document {
    pub fn is_public(&self) -> bool {
        self.public_at.is_some()
    }

    pub fn status_tone(&self) -> Tone {
        match self.status.to_lowercase().as_str() {
            "approved" => Tone::Positive,
            "pending" => Tone::Pending,
            _ => Tone::Negative,
        }
    }
}
