use serde::Deserialize;

use super::{string_or_number, Tone};

pub static INVITE_STATUSES: &[(&str, &str)] = &[("1", "Accepted"), ("2", "Invited"), ("3", "Rejected")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteStatus {
    Accepted,
    Invited,
    Rejected,
}

impl InviteStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Accepted,
            2 => Self::Invited,
            _ => Self::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Invited => "Invited",
            Self::Rejected => "Rejected",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Accepted => Tone::Positive,
            Self::Invited => Tone::Pending,
            Self::Rejected => Tone::Negative,
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberUser {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub member_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub total_workgroups: String,
    #[serde(default)]
    pub status: u8,
    #[serde(default)]
    pub invite_accepted_at: Option<String>,
}

impl MemberUser {
    pub fn invite_status(&self) -> InviteStatus {
        InviteStatus::from_code(self.status)
    }
}
