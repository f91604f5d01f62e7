use serde::{Deserialize, Serialize};

use crate::model::entry::Entry;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Substring,
    ReverseSubstring,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub entry: Entry,

    pub kind: MatchKind,

    // Offsets em CARACTERES dentro da query (0-based, end exclusivo),
    // presentes apenas quando o trecho casado está dentro da query.
    #[serde(default)]
    pub start_index: Option<usize>,

    #[serde(default)]
    pub end_index: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,

    // Índice do MatchResult de origem na lista passada a highlight_spans.
    pub match_ref: usize,
}
