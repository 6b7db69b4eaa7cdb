use serde::Deserialize;

use super::string_or_number;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workgroup {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}
