use serde::Deserialize;
use serde_json::Value;

use crate::model::entry::Entry;

const DEFAULT_HEADER_ROWS: usize = 1;
const DEFAULT_UTTERER_COL: usize = 0;
const DEFAULT_CONTEXT_COL: usize = 1;
const DEFAULT_SOURCE_COL: usize = 2;
const DEFAULT_TRANSLATED_COL: usize = 3;

#[derive(Debug, Clone)]
pub struct GridLayout {
    pub header_rows: usize,
    pub utterer: usize,
    pub context: usize,
    pub source: usize,
    pub translated: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout {
            header_rows: DEFAULT_HEADER_ROWS,
            utterer: DEFAULT_UTTERER_COL,
            context: DEFAULT_CONTEXT_COL,
            source: DEFAULT_SOURCE_COL,
            translated: DEFAULT_TRANSLATED_COL,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GridSheet {
    #[serde(default)]
    name: String,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

// Despejo de workbook: uma aba = nome + matriz de células. O número da
// linha segue a numeração da planilha (1-based, cabeçalho incluso).
pub fn parse(text: &str, layout: &GridLayout) -> Result<Vec<Entry>, String> {
    let sheets: Vec<GridSheet> = match serde_json::from_str::<Vec<GridSheet>>(text) {
        Ok(sheets) => sheets,
        Err(_) => {
            let single: GridSheet = serde_json::from_str(text)
                .map_err(|e| format!("failed to parse grid json: {e}"))?;
            vec![single]
        }
    };

    let mut entries = Vec::new();

    for sheet in sheets {
        for (i, row) in sheet.rows.iter().enumerate() {
            if i < layout.header_rows {
                continue;
            }
            entries.push(Entry {
                utterer: cell(row, layout.utterer),
                context: cell(row, layout.context),
                source_text: cell(row, layout.source),
                translated_text: cell(row, layout.translated),
                sheet_name: sheet.name.clone(),
                row_number: i + 1,
            });
        }
    }

    Ok(entries)
}

// Linhas curtas e células não-texto não derrubam a carga.
fn cell(row: &[Value], index: usize) -> String {
    match row.get(index) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
