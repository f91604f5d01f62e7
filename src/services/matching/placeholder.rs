use regex::Regex;

use crate::model::entry::Entry;

// Palavra-marcador que o conjunto de dados usa como sufixo de entidade
// nomeada. Pode ser sobrescrita por comando/config.
pub const DEFAULT_NAME_MARKER: &str = "NPC";

pub fn extract_placeholder_candidates(text: &str) -> Vec<String> {
    extract_with_marker(text, DEFAULT_NAME_MARKER)
}

// Candidato = sequência de palavras capitalizadas com duas ou mais
// palavras, ou sequência seguida do marcador (o marcador pode ser
// minúsculo, então entra no padrão como sufixo opcional literal).
// Uma palavra capitalizada sozinha só vira candidato via corpus de
// personagens (extract_with_characters).
pub fn extract_with_marker(text: &str, marker: &str) -> Vec<String> {
    let pattern = if marker.is_empty() {
        r"[A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*".to_string()
    } else {
        format!(
            r"[A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*(?:\s+{})?",
            regex::escape(marker)
        )
    };
    let run_re = Regex::new(&pattern).unwrap();

    let mut out: Vec<String> = Vec::new();

    for m in run_re.find_iter(text) {
        let run = m.as_str();
        if run.split_whitespace().count() >= 2 {
            push_unique(&mut out, run);
        }
    }

    out
}

// Variante ciente do corpus: além do padrão, aceita palavra capitalizada
// sozinha quando ela corresponde a um personagem (nome completo ou
// primeira palavra do nome, ex.: "Trusty" -> "Trusty Ass").
pub fn extract_with_characters(text: &str, marker: &str, characters: &[Entry]) -> Vec<String> {
    let mut out = extract_with_marker(text, marker);

    let word_re = Regex::new(r"[A-Z][A-Za-z]*").unwrap();

    for m in word_re.find_iter(text) {
        let word = m.as_str();
        if is_character_name(word, characters) {
            push_unique(&mut out, word);
        }
    }

    out
}

pub fn bracketed(name: &str) -> String {
    format!("[{name}]")
}

// Conteúdos [assim] presentes num rascunho (usado pelo review).
pub fn scan_bracketed(text: &str) -> Vec<String> {
    let re = Regex::new(r"\[([^\[\]]+)\]").unwrap();
    re.captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

fn is_character_name(word: &str, characters: &[Entry]) -> bool {
    let lowered = word.to_lowercase();

    characters.iter().any(|c| {
        if c.source_text.is_empty() {
            return false;
        }
        if c.source_text.to_lowercase() == lowered {
            return true;
        }
        c.source_text
            .split_whitespace()
            .next()
            .map(|first| first.to_lowercase() == lowered)
            .unwrap_or(false)
    })
}

fn push_unique(out: &mut Vec<String>, candidate: &str) {
    let lowered = candidate.to_lowercase();
    if !out.iter().any(|c| c.to_lowercase() == lowered) {
        out.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(name: &str) -> Entry {
        Entry {
            source_text: name.to_string(),
            translated_text: String::new(),
            ..Default::default()
        }
    }

    #[test]
    fn marker_suffixed_name_is_a_candidate() {
        let out = extract_with_marker("He saw Trusty NPC wave goodbye", "NPC");
        assert_eq!(out, vec!["Trusty NPC"]);
    }

    #[test]
    fn lowercase_marker_extends_the_run() {
        let out = extract_with_marker("He saw Trusty san wave goodbye", "san");
        assert_eq!(out, vec!["Trusty san"]);
    }

    #[test]
    fn sentence_initial_word_joins_an_adjacent_run() {
        let out = extract_with_marker("Old Sign creaks in the wind", "NPC");
        assert_eq!(out, vec!["Old Sign"]);
    }

    #[test]
    fn multi_word_capitalized_run_is_a_candidate_without_marker() {
        let out = extract_with_marker("Near the Old Sign stood a cart", "NPC");
        assert_eq!(out, vec!["Old Sign"]);
    }

    #[test]
    fn single_capitalized_word_is_not_a_pattern_candidate() {
        let out = extract_with_marker("Trusty waved from the bridge", "NPC");
        assert!(out.is_empty());
    }

    #[test]
    fn candidates_are_deduplicated_in_insertion_order() {
        let out = extract_with_marker("Old Sign here, OLD SIGN there, then Wise Ox", "NPC");
        assert_eq!(out, vec!["Old Sign", "Wise Ox"]);
    }

    #[test]
    fn character_corpus_admits_shortened_single_word_name() {
        let characters = vec![character("Trusty Ass"), character("Wise Ox")];
        let out = extract_with_characters("Trusty waved from the bridge", "NPC", &characters);
        assert_eq!(out, vec!["Trusty"]);
    }

    #[test]
    fn pattern_candidates_come_before_corpus_names() {
        let characters = vec![character("Trusty Ass")];
        let out =
            extract_with_characters("Trusty stood by the Old Sign", "NPC", &characters);
        assert_eq!(out, vec!["Old Sign", "Trusty"]);
    }

    #[test]
    fn corpus_lookup_does_not_duplicate_pattern_candidates() {
        let characters = vec![character("Trusty Ass")];
        let out = extract_with_characters("Trusty Ass nodded at Trusty", "NPC", &characters);
        assert_eq!(out, vec!["Trusty Ass", "Trusty"]);
    }

    #[test]
    fn bracketed_renders_insertion_form() {
        assert_eq!(bracketed("Trusty Ass"), "[Trusty Ass]");
    }

    #[test]
    fn scan_bracketed_finds_draft_placeholders() {
        let found = scan_bracketed("Hij zwaaide naar [Trusty Ass] en [Wise Ox].");
        assert_eq!(found, vec!["Trusty Ass", "Wise Ox"]);
    }
}
