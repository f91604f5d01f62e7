pub mod grid;
pub mod sheets;
pub mod table;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::entry::Entry;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorpusFormat {
    Table,
    Sheets,
    Grid,
}

// CSV resolve pela extensão; JSON precisa olhar a forma do documento,
// porque planilha exportada e despejo de workbook usam o mesmo .json.
pub fn detect_format(path: &Path, text: &str) -> Result<CorpusFormat, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(CorpusFormat::Table),
        "json" => sniff_json(text),
        other => Err(format!("unsupported corpus extension: {other:?}")),
    }
}

fn sniff_json(text: &str) -> Result<CorpusFormat, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("failed to parse corpus json: {e}"))?;

    let head = match &value {
        serde_json::Value::Array(items) => items.first().unwrap_or(&serde_json::Value::Null),
        other => other,
    };

    if let Some(obj) = head.as_object() {
        if obj.contains_key("rows") {
            return Ok(CorpusFormat::Grid);
        }
        if obj.contains_key("entries") || obj.contains_key("sheets") {
            return Ok(CorpusFormat::Sheets);
        }
    }

    Err("unrecognized corpus json shape".to_string())
}

pub fn parse(format: CorpusFormat, text: &str) -> Result<Vec<Entry>, String> {
    let entries = match format {
        CorpusFormat::Table => table::parse(text)?,
        CorpusFormat::Sheets => sheets::parse(text)?,
        CorpusFormat::Grid => grid::parse(text, &grid::GridLayout::default())?,
    };
    Ok(normalize(entries))
}

// Normalização única na carga: o motor de busca nunca re-trima.
pub fn normalize(entries: Vec<Entry>) -> Vec<Entry> {
    let total = entries.len();

    let kept: Vec<Entry> = entries
        .into_iter()
        .map(|mut e| {
            e.source_text = e.source_text.trim().to_string();
            e.translated_text = e.translated_text.trim().to_string();
            e.context = e.context.trim().to_string();
            e.utterer = e.utterer.trim().to_string();
            e.sheet_name = e.sheet_name.trim().to_string();
            e
        })
        .filter(|e| !e.source_text.is_empty())
        .collect();

    let dropped = total - kept.len();
    if dropped > 0 {
        eprintln!("[corpus] dropped {dropped} rows with empty source text");
    }

    kept
}
