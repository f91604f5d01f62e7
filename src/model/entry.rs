use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    #[serde(default, alias = "sourceText")]
    pub source_text: String,

    #[serde(default, alias = "translatedText")]
    pub translated_text: String,

    #[serde(default)]
    pub context: String,

    #[serde(default)]
    pub utterer: String,

    #[serde(default, alias = "sheetName")]
    pub sheet_name: String,

    #[serde(default, alias = "rowNumber")]
    pub row_number: usize,
}

impl Entry {
    pub fn row_key(&self) -> String {
        format!("{}:{}", self.sheet_name, self.row_number)
    }
}
