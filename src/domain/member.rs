use serde::Deserialize;

pub static SECTORS: &[(&str, &str)] = &[
    ("1", "Public Sector"),
    ("2", "Private Sector"),
    ("3", "Research & Academia"),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub sector: u64,
    #[serde(default)]
    pub joined_at: String,
    #[serde(default)]
    pub total_users: u64,
}

impl Member {
    pub fn sector_label(&self) -> &'static str {
        let code = self.sector.to_string();
        SECTORS
            .iter()
            .find(|(value, _)| *value == code)
            .map(|(_, label)| *label)
            .unwrap_or("Unknown")
    }
}
