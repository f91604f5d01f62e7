use serde::Serialize;

use crate::model::entry::Entry;
use crate::services::corpus::{CorpusCache, CorpusKind};
use crate::services::matching::highlight::highlight_spans;
use crate::services::matching::matcher::{find_matches, rank_matches};
use crate::services::matching::model::{MatchResult, Span};

#[derive(Debug, Serialize)]
pub struct CorpusMatches {
    pub corpus: String,
    pub matches: Vec<MatchResult>,
}

// Consulta cada aba carregada na ordem de carga, abas de personagens
// incluídas (nomes também são sugestões). Abas sem resultado ficam fora
// da resposta.
pub fn collect_matches(query: &str, cache: &CorpusCache) -> Vec<CorpusMatches> {
    let mut out = Vec::new();

    for corpus in cache.iter() {
        let mut matches = find_matches(query, &corpus.entries);
        if matches.is_empty() {
            continue;
        }
        rank_matches(&mut matches);

        out.push(CorpusMatches {
            corpus: corpus.name.clone(),
            matches,
        });
    }

    out
}

// Para realce os grupos são achatados: span.match_ref indexa a lista
// achatada devolvida junto.
pub fn collect_spans(query: &str, cache: &CorpusCache) -> (Vec<MatchResult>, Vec<Span>) {
    let mut merged: Vec<MatchResult> = Vec::new();
    for group in collect_matches(query, cache) {
        merged.extend(group.matches);
    }

    let spans = highlight_spans(query, &merged);
    (merged, spans)
}

pub fn character_entries(cache: &CorpusCache) -> Vec<Entry> {
    cache
        .iter()
        .filter(|c| c.kind == CorpusKind::Characters)
        .flat_map(|c| c.entries.iter().cloned())
        .collect()
}
