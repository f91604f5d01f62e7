use crate::model::entry::Entry;

use super::model::{MatchKind, MatchResult};
use super::normalize;

pub fn find_matches(query: &str, corpus: &[Entry]) -> Vec<MatchResult> {
    if query.is_empty() || corpus.is_empty() {
        return Vec::new();
    }

    let folded_query = normalize::fold(query);
    let query_chars = query.chars().count();

    let mut results: Vec<MatchResult> = Vec::new();

    for e in corpus {
        // Entrada malformada (source vazio) nunca casa, por nenhuma regra.
        if e.source_text.is_empty() {
            continue;
        }

        let folded_source = normalize::fold(&e.source_text);

        if folded_query.same_text(&folded_source) {
            results.push(MatchResult {
                entry: e.clone(),
                kind: MatchKind::Exact,
                start_index: Some(0),
                end_index: Some(query_chars),
            });
            continue;
        }

        if let Some((start, end)) = folded_query.find(&folded_source) {
            results.push(MatchResult {
                entry: e.clone(),
                kind: MatchKind::Substring,
                start_index: Some(start),
                end_index: Some(end),
            });
            continue;
        }

        if folded_source.contains(&folded_query) {
            results.push(MatchResult {
                entry: e.clone(),
                kind: MatchKind::ReverseSubstring,
                start_index: None,
                end_index: None,
            });
            continue;
        }

        if e.translated_text.is_empty() {
            continue;
        }

        let folded_translated = normalize::fold(&e.translated_text);

        if let Some((start, end)) = folded_query.find(&folded_translated) {
            results.push(MatchResult {
                entry: e.clone(),
                kind: MatchKind::Substring,
                start_index: Some(start),
                end_index: Some(end),
            });
            continue;
        }

        if folded_translated.contains(&folded_query) {
            results.push(MatchResult {
                entry: e.clone(),
                kind: MatchKind::ReverseSubstring,
                start_index: None,
                end_index: None,
            });
        }
    }

    results
}

// Exact primeiro, depois source mais longo; empate preserva a ordem de
// entrada (sort estável).
pub fn rank_matches(matches: &mut [MatchResult]) {
    matches.sort_by_key(|m| {
        (
            m.kind != MatchKind::Exact,
            std::cmp::Reverse(m.entry.source_text.chars().count()),
        )
    });
}
