use serde::Deserialize;

use crate::model::entry::Entry;

#[derive(Debug, Deserialize)]
struct SheetFile {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    #[serde(default, alias = "sheetName")]
    name: String,
    #[serde(default)]
    entries: Vec<Entry>,
}

// Aceita tanto a lista de abas nua quanto o invólucro {"sheets": [...]}.
pub fn parse(text: &str) -> Result<Vec<Entry>, String> {
    let sheets: Vec<Sheet> = match serde_json::from_str::<Vec<Sheet>>(text) {
        Ok(sheets) => sheets,
        Err(_) => {
            serde_json::from_str::<SheetFile>(text)
                .map_err(|e| format!("failed to parse sheets json: {e}"))?
                .sheets
        }
    };

    let mut entries = Vec::new();

    for sheet in sheets {
        for (i, mut entry) in sheet.entries.into_iter().enumerate() {
            if entry.sheet_name.is_empty() {
                entry.sheet_name = sheet.name.clone();
            }
            if entry.row_number == 0 {
                entry.row_number = i + 1;
            }
            entries.push(entry);
        }
    }

    Ok(entries)
}
