use serde::Serialize;

use crate::model::entry::Entry;
use crate::model::session::SessionState;
use crate::services::matching::placeholder;

#[derive(Debug, Serialize)]
pub struct ReviewIssue {
    pub row_key: String,
    pub code: String,
    pub message: String,
}

// Revisa o rascunho efetivo de cada linha: o da sessão quando existe,
// senão a tradução que veio no corpus.
pub fn run(
    entries: &[Entry],
    session: &SessionState,
    characters: &[Entry],
    marker: &str,
) -> Vec<ReviewIssue> {
    let mut issues: Vec<ReviewIssue> = Vec::new();

    for entry in entries {
        let row_key = entry.row_key();
        let draft = session
            .translations
            .get(&row_key)
            .map(|d| d.as_str())
            .unwrap_or(entry.translated_text.as_str());

        let source_trim = entry.source_text.trim();
        let draft_trim = draft.trim();

        if source_trim.is_empty() {
            issues.push(ReviewIssue {
                row_key: row_key.clone(),
                code: "EMPTY_SOURCE".to_string(),
                message: "row has no source text".to_string(),
            });
        }

        if !draft_trim.is_empty() && draft_trim == source_trim {
            issues.push(ReviewIssue {
                row_key: row_key.clone(),
                code: "SAME_AS_SOURCE".to_string(),
                message: "draft is identical to the source text".to_string(),
            });
        }

        // Todo [nome] do rascunho tem que corresponder a um candidato
        // extraído da fonte desta linha.
        let known = placeholder::extract_with_characters(source_trim, marker, characters);
        for name in placeholder::scan_bracketed(draft) {
            let recognized = known.iter().any(|k| k.to_lowercase() == name.to_lowercase());
            if !recognized {
                issues.push(ReviewIssue {
                    row_key: row_key.clone(),
                    code: "UNKNOWN_PLACEHOLDER".to_string(),
                    message: format!("placeholder [{name}] has no candidate in the source text"),
                });
            }
        }
    }

    issues
}
