use serde::{Deserialize, Serialize};

use crate::domain::Character;

/// Body of `GET <base>/character/?page={n}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPage {
    pub results: Vec<Character>,
    pub info: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}
