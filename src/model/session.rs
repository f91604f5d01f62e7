use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub corpus: String,

    #[serde(default)]
    pub current_index: usize,

    // chave "sheet:row" -> rascunho de tradução
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl SessionState {
    pub fn new(name: impl Into<String>) -> Self {
        SessionState {
            name: name.into(),
            ..Default::default()
        }
    }
}
