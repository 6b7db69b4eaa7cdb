use serde::Deserialize;

use super::Tone;

pub static LINK_STATUSES: &[(&str, &str)] = &[("0", "Rejected"), ("1", "Pending"), ("2", "Approved")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Approved,
    Pending,
    Rejected,
}

impl LinkStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Self::Approved,
            1 => Self::Pending,
            _ => Self::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Approved => Tone::Positive,
            Self::Pending => Tone::Pending,
            Self::Rejected => Tone::Negative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub id: u64,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub status: u8,
    #[serde(default)]
    pub public_at: Option<String>,
}

impl Link {
    pub fn link_status(&self) -> LinkStatus {
        LinkStatus::from_code(self.status)
    }

    pub fn is_public(&self) -> bool {
        self.public_at.is_some()
    }
}
