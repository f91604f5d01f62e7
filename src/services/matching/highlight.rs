use super::model::{MatchResult, Span};
use super::normalize;

// Converte matches (possivelmente sobrepostos) em spans disjuntos:
// frase mais longa vence, apenas a primeira ocorrência de cada frase
// conta, e um span só é aceito se começa e termina em fronteira de
// palavra (nunca no meio de uma sequência alfanumérica).
pub fn highlight_spans(query: &str, matches: &[MatchResult]) -> Vec<Span> {
    if query.is_empty() || matches.is_empty() {
        return Vec::new();
    }

    let query_chars: Vec<char> = query.chars().collect();
    let folded_query = normalize::fold(query);

    let mut order: Vec<usize> = (0..matches.len())
        .filter(|&i| !matches[i].entry.source_text.is_empty())
        .collect();
    order.sort_by_key(|&i| std::cmp::Reverse(matches[i].entry.source_text.chars().count()));

    let mut accepted: Vec<Span> = Vec::new();

    for idx in order {
        let folded_source = normalize::fold(&matches[idx].entry.source_text);

        // Sem ocorrência dentro da query (ReverseSubstring, match por
        // texto traduzido): não vira span.
        let (start, end) = match folded_query.find(&folded_source) {
            Some(range) => range,
            None => continue,
        };

        if !on_word_boundary(&query_chars, start, end) {
            continue;
        }

        if accepted.iter().any(|s| start < s.end && s.start < end) {
            continue;
        }

        accepted.push(Span {
            start,
            end,
            match_ref: idx,
        });
    }

    accepted.sort_by_key(|s| s.start);
    accepted
}

fn on_word_boundary(chars: &[char], start: usize, end: usize) -> bool {
    let alnum = |i: usize| chars.get(i).map(|c| c.is_alphanumeric()).unwrap_or(false);

    if start > 0 && alnum(start - 1) && alnum(start) {
        return false;
    }

    if end < chars.len() && alnum(end - 1) && alnum(end) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::Entry;
    use crate::services::matching::matcher::find_matches;
    use crate::services::matching::model::MatchKind;

    fn entry(source: &str, translated: &str) -> Entry {
        Entry {
            source_text: source.to_string(),
            translated_text: translated.to_string(),
            ..Default::default()
        }
    }

    fn corpus_spans(query: &str, corpus: &[Entry]) -> Vec<Span> {
        let matches = find_matches(query, corpus);
        highlight_spans(query, &matches)
    }

    #[test]
    fn single_phrase_span_has_expected_offsets() {
        let corpus = vec![entry("Hello there", "Hallo daar")];
        let spans = corpus_spans("Well, Hello there, friend", &corpus);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (6, 17));
    }

    #[test]
    fn longer_phrase_wins_over_nested_shorter_one() {
        let corpus = vec![entry("Dirty Sign", "Vuil Bord"), entry("Sign", "Bord")];
        let spans = corpus_spans("The Dirty Sign", &corpus);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (4, 14));
    }

    #[test]
    fn overlapping_phrases_never_produce_overlapping_spans() {
        let corpus = vec![entry("Old", "Oud"), entry("Old Sign", "Oud Bord")];
        let spans = corpus_spans("The Old Sign creaks", &corpus);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (4, 12));

        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn no_match_inside_a_larger_word() {
        let corpus = vec![entry("Ass", "Ezel")];
        let spans = corpus_spans("Assistant helped", &corpus);
        assert!(spans.is_empty());
    }

    #[test]
    fn spans_are_sorted_by_start() {
        let corpus = vec![entry("friend", "vriend"), entry("Hello", "Hallo")];
        let spans = corpus_spans("Hello my friend", &corpus);

        assert_eq!(spans.len(), 2);
        assert!(spans[0].start < spans[1].start);
        assert_eq!((spans[0].start, spans[0].end), (0, 5));
        assert_eq!((spans[1].start, spans[1].end), (9, 15));
    }

    #[test]
    fn exact_match_covers_whole_query() {
        let corpus = vec![entry("Hello there", "Hallo daar")];
        let spans = corpus_spans("hello there", &corpus);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (0, 11));
    }

    #[test]
    fn reverse_substring_produces_no_span() {
        let corpus = vec![entry("The Old Sign creaks at night", "")];
        let matches = find_matches("Old Sign", &corpus);
        assert_eq!(matches[0].kind, MatchKind::ReverseSubstring);
        assert!(highlight_spans("Old Sign", &matches).is_empty());
    }

    #[test]
    fn zero_length_source_is_excluded() {
        let matches = vec![MatchResult {
            entry: entry("", "leeg"),
            kind: MatchKind::Substring,
            start_index: Some(0),
            end_index: Some(0),
        }];
        assert!(highlight_spans("iets", &matches).is_empty());
    }

    #[test]
    fn match_ref_points_into_input_slice() {
        let corpus = vec![entry("friend", "vriend"), entry("Hello", "Hallo")];
        let matches = find_matches("Hello my friend", &corpus);
        let spans = highlight_spans("Hello my friend", &matches);

        for span in &spans {
            let source = &matches[span.match_ref].entry.source_text;
            let covered: String = "Hello my friend"
                .chars()
                .skip(span.start)
                .take(span.end - span.start)
                .collect();
            assert!(source.eq_ignore_ascii_case(&covered));
        }
    }

    #[test]
    fn first_occurrence_only_even_if_blocked() {
        // "Sign" aparece primeiro dentro de "Assign" (fronteira inválida);
        // a ocorrência válida mais adiante não é reaproveitada.
        let corpus = vec![entry("Sign", "Bord")];
        let spans = corpus_spans("Assign the Sign", &corpus);
        assert!(spans.is_empty());
    }
}
