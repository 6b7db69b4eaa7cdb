pub mod document;
pub mod link;
pub mod member;
pub mod member_user;
pub mod record;
pub mod workgroup;

pub use document::*;
pub use link::*;
pub use member::*;
pub use member_user::*;
pub use record::*;
pub use workgroup::*;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// How a status reads at a glance; widgets map this to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Pending,
    Negative,
}

/// Renders a backend timestamp as `05 Mar 2024`, falling back to the raw text.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d %b %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d %b %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d %b %Y").to_string();
    }
    raw.to_string()
}

/// Accepts `3`, `"3"` or `null` for count-like fields the backend is
/// inconsistent about.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_formats() {
        assert_eq!(display_date("2024-03-05T10:11:12.000Z"), "05 Mar 2024");
        assert_eq!(display_date("2024-03-05 10:11:12"), "05 Mar 2024");
        assert_eq!(display_date("2024-03-05"), "05 Mar 2024");
        assert_eq!(display_date("last week"), "last week");
        assert_eq!(display_date(""), "-");
    }
}
